use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use super::archive::extract_audio;
use super::backend::{StatusReport, SynthesisBackend};
use super::error::{SynthesisError, SynthesisResult};
use super::naming::audio_blob_name;
use super::storage::AudioStore;
use crate::config::SynthesisSettings;

/// Published audio of a finished job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedAudio {
    pub audio_url: String,
    pub blob_name: String,
    pub size_bytes: u64,
    pub duration_seconds: Option<f64>,
}

/// Moves a finished job's audio from the backend into the audio store.
///
/// The blob name depends only on the job id and uploads overwrite, so running
/// this twice for one job leaves a single object behind.
pub struct ResultMaterializer {
    backend: Arc<dyn SynthesisBackend>,
    store: Arc<dyn AudioStore>,
    settings: Arc<SynthesisSettings>,
}

impl ResultMaterializer {
    pub fn new(
        backend: Arc<dyn SynthesisBackend>,
        store: Arc<dyn AudioStore>,
        settings: Arc<SynthesisSettings>,
    ) -> Self {
        Self {
            backend,
            store,
            settings,
        }
    }

    pub async fn materialize(
        &self,
        job_id: &str,
        report: &StatusReport,
    ) -> SynthesisResult<CompletedAudio> {
        let result_url = report.result_url.as_deref().ok_or_else(|| {
            SynthesisError::Materialization("No result URL in successful job".to_string())
        })?;

        let bundle = self.backend.fetch_result(result_url).await.map_err(|e| {
            SynthesisError::Materialization(format!("Failed to download synthesis results: {e}"))
        })?;
        let audio = extract_audio(&bundle)?;
        info!(synthesis_id = %job_id, entry = %audio.name, size_bytes = audio.data.len(), "Extracted audio");

        let extracted_size = audio.data.len() as u64;
        let blob_name = audio_blob_name(job_id, &self.settings.audio_extension);
        self.store.put(&blob_name, Bytes::from(audio.data)).await?;
        let audio_url = self
            .store
            .sign_url(&blob_name, self.settings.signed_url_expiry())
            .await?;

        Ok(CompletedAudio {
            audio_url,
            blob_name,
            size_bytes: report.size_bytes.unwrap_or(extracted_size),
            duration_seconds: report
                .duration_ms
                .filter(|ms| *ms > 0)
                .map(|ms| ms as f64 / 1000.0),
        })
    }
}
