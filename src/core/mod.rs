pub mod archive;
pub mod backend;
pub mod catalog;
pub mod error;
pub mod job;
pub mod markup;
pub mod materializer;
pub mod naming;
pub mod poller;
pub mod providers;
pub mod service;
pub mod speech;
pub mod storage;
pub mod submitter;
pub mod text;
pub mod validation;

// Re-export commonly used types for convenience
pub use backend::{
    AzureBatchClient, BackendJobStatus, JobRequest, ScriptedBackend, StatusReport,
    SynthesisBackend,
};
pub use error::{BackendError, StorageError, SynthesisError, SynthesisResult};
pub use job::{JobStatus, SynthesisJob};
pub use materializer::{CompletedAudio, ResultMaterializer};
pub use poller::{CheckOutcome, PollMode, StatusPoller};
pub use service::{SpokenAudio, StartRequest, SynthesisService};
pub use speech::{AzureSpeechClient, SpeechSynthesizer, StaticSynthesizer};
pub use storage::{AudioStore, BlobAudioStore};
pub use submitter::{SubmitReceipt, SubmitRequest, SynthesisSubmitter};
