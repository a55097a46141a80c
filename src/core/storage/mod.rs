//! Audio object storage.
//!
//! Audio lives under the job's blob name and is handed to clients as a signed,
//! expiring read URL. Writes overwrite, so storing the same job twice leaves
//! exactly one object.

mod cleanup;
mod object;
mod sas;

pub use cleanup::{BlobInfo, CleanupReport, StorageStats};
pub use object::BlobAudioStore;
pub use sas::{SAS_VERSION, SasSigner};

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::error::StorageError;

#[async_trait]
pub trait AudioStore: Send + Sync {
    /// Write `bytes` under `key`, replacing any existing object
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), StorageError>;

    /// Read-only URL for `key`, valid for `expiry`
    async fn sign_url(&self, key: &str, expiry: Duration) -> Result<String, StorageError>;
}
