use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::backend::{JobRequest, SynthesisBackend};
use super::error::{SynthesisError, SynthesisResult};
use super::job::SynthesisJob;
use super::markup::{CharacterOverride, MarkupRequest, MarkupShape, build_markup};
use super::naming::{audio_blob_name, derive_job_id};
use super::storage::AudioStore;
use crate::config::SynthesisSettings;

/// A validated request with voice and style already resolved
#[derive(Debug, Clone, Default)]
pub struct SubmitRequest {
    pub text: String,
    pub voice: String,
    pub style: Option<String>,
    pub title: Option<String>,
    pub character_voices: bool,
    pub character_overrides: HashMap<String, CharacterOverride>,
}

/// Answer to a submit call.
///
/// `audio_url` already points at the final blob but only resolves once the
/// job has been checked to completion.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReceipt {
    #[serde(rename = "synthesis_id")]
    pub job_id: String,
    pub status: &'static str,
    pub audio_url: String,
    pub voice: String,
    pub style: Option<String>,
    pub character_voices: bool,
    pub text_length: usize,
    pub estimated_duration_minutes: f64,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

/// Creates backend jobs. Keeps no state between calls.
pub struct SynthesisSubmitter {
    backend: Arc<dyn SynthesisBackend>,
    store: Arc<dyn AudioStore>,
    settings: Arc<SynthesisSettings>,
}

impl SynthesisSubmitter {
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

    fn markup_for(&self, request: &SubmitRequest) -> String {
        let shape = MarkupShape::from_character_flag(request.character_voices);
        build_markup(
            shape,
            &MarkupRequest {
                text: &request.text,
                voice: &request.voice,
                style: request.style.as_deref(),
                narrator_voice: &self.settings.narrator_voice,
                narrator_style: self.settings.narrator_style.as_deref(),
                overrides: Some(&request.character_overrides),
            },
        )
    }

    pub async fn submit(&self, request: &SubmitRequest) -> SynthesisResult<SubmitReceipt> {
        let settings = &self.settings;
        let job_id = derive_job_id(
            &request.text,
            settings.id_word_count,
            settings.id_max_length,
        );
        let job = SynthesisJob::new(
            job_id.as_str(),
            request.voice.as_str(),
            request.style.clone(),
            request.text.chars().count(),
        );

        info!(
            synthesis_id = %job_id,
            text_length = job.text_length(),
            character_voices = request.character_voices,
            "Starting batch synthesis"
        );

        let job_request = JobRequest {
            markup: self.markup_for(request),
            description: request
                .title
                .clone()
                .unwrap_or_else(|| format!("Story {}", job.created_at().to_rfc3339())),
            output_format: settings.output_format.clone(),
            ttl_hours: settings.synthesis_ttl_hours,
        };
        self.backend
            .create_job(&job_id, &job_request)
            .await
            .map_err(SynthesisError::BackendSubmit)?;

        let blob_name = audio_blob_name(&job_id, &settings.audio_extension);
        let audio_url = self
            .store
            .sign_url(&blob_name, settings.signed_url_expiry())
            .await?;

        Ok(SubmitReceipt {
            job_id: job.job_id().to_string(),
            status: "started",
            audio_url,
            voice: job.voice().to_string(),
            style: job.style().map(str::to_string),
            character_voices: request.character_voices,
            text_length: job.text_length(),
            estimated_duration_minutes: job.estimated_duration_minutes(),
            created_at: job.created_at(),
            message: "Synthesis started. Audio URL will be available when complete (typically 1-3 min)."
                .to_string(),
        })
    }
}
