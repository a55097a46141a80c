//! Request-level facade over the synthesis workflow.
//!
//! Turns raw client requests into validated submissions, resolves voice and
//! style from presets and defaults, and hosts the synchronous path for short
//! texts.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::backend::{AzureBatchClient, SynthesisBackend};
use super::catalog::find_preset;
use super::error::{SynthesisError, SynthesisResult};
use super::markup::{CharacterOverride, build_simple_ssml};
use super::materializer::ResultMaterializer;
use super::naming::{audio_blob_name, derive_job_id};
use super::poller::{CheckOutcome, PollMode, StatusPoller};
use super::speech::{AzureSpeechClient, SpeechSynthesizer};
use super::storage::{AudioStore, BlobAudioStore};
use super::submitter::{SubmitReceipt, SubmitRequest, SynthesisSubmitter};
use super::text::{clean_markdown_for_speech, looks_like_story};
use super::validation::{
    BatchStartInput, validate_batch_start_request, validate_synthesis_id, validate_voice,
};
use crate::config::{ServerConfig, SynthesisSettings};

/// Body of a batch start request as sent by clients
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
    pub style: Option<String>,
    pub preset: Option<String>,
    pub title: Option<String>,
    /// Unset means "decide from the text"
    pub character_voices: Option<bool>,
    #[serde(default)]
    pub character_overrides: HashMap<String, CharacterOverride>,
    /// Unset means clean
    pub clean_markdown: Option<bool>,
}

/// Audio produced by the synchronous path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpokenAudio {
    pub url: String,
    pub filename: String,
    pub voice: String,
    pub size_bytes: u64,
    pub text_length: usize,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

pub struct SynthesisService {
    settings: Arc<SynthesisSettings>,
    submitter: SynthesisSubmitter,
    poller: StatusPoller,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: Arc<dyn AudioStore>,
}

impl SynthesisService {
    pub fn new(
        settings: SynthesisSettings,
        backend: Arc<dyn SynthesisBackend>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: Arc<dyn AudioStore>,
    ) -> Self {
        let settings = Arc::new(settings);
        let submitter = SynthesisSubmitter::new(backend.clone(), store.clone(), settings.clone());
        let materializer = ResultMaterializer::new(backend.clone(), store.clone(), settings.clone());
        let poller = StatusPoller::new(backend, materializer, settings.clone());

        Self {
            settings,
            submitter,
            poller,
            synthesizer,
            store,
        }
    }

    /// Wire the Azure clients and blob store from server configuration
    pub fn from_config(config: &ServerConfig) -> SynthesisResult<Self> {
        let speech = config
            .speech_credentials()
            .map_err(SynthesisError::Configuration)?;
        let storage = config
            .storage_credentials()
            .map_err(SynthesisError::Configuration)?;

        let backend = AzureBatchClient::from_credentials(&speech)
            .map_err(|e| SynthesisError::Configuration(e.to_string()))?;
        let synthesizer = AzureSpeechClient::from_credentials(&speech)
            .map_err(|e| SynthesisError::Configuration(e.to_string()))?;
        let store = BlobAudioStore::azure(&storage)?;

        Ok(Self::new(
            config.synthesis.clone(),
            Arc::new(backend),
            Arc::new(synthesizer),
            Arc::new(store),
        ))
    }

    pub fn settings(&self) -> &SynthesisSettings {
        &self.settings
    }

    /// Validate, prepare and submit a batch request
    pub async fn start(&self, request: &StartRequest) -> SynthesisResult<SubmitReceipt> {
        let settings = &self.settings;
        validate_batch_start_request(
            &BatchStartInput {
                text: request.text.as_deref(),
                voice: request.voice.as_deref(),
                style: request.style.as_deref(),
                preset: request.preset.as_deref(),
                title: request.title.as_deref(),
            },
            settings.min_text_length,
            settings.max_batch_text_length,
        )?;

        let raw_text = request.text.as_deref().unwrap_or_default();
        let text = if request.clean_markdown.unwrap_or(true) {
            clean_markdown_for_speech(raw_text)
        } else {
            raw_text.trim().to_string()
        };
        if text.is_empty() {
            return Err(SynthesisError::validation(
                "text is empty after markdown cleanup",
                "text",
            ));
        }

        let preset = non_empty(request.preset.as_deref()).and_then(find_preset);
        let voice = non_empty(request.voice.as_deref())
            .or(preset.map(|p| p.voice))
            .unwrap_or(settings.default_voice.as_str())
            .to_string();
        let style = match non_empty(request.style.as_deref()) {
            Some(style) => Some(style.to_string()),
            None => match preset {
                Some(preset) => preset.style.map(str::to_string),
                None => settings.default_style.clone(),
            },
        };

        let character_voices = request
            .character_voices
            .unwrap_or_else(|| settings.enable_character_voices && looks_like_story(&text));

        self.submitter
            .submit(&SubmitRequest {
                text,
                voice,
                style,
                title: request.title.clone(),
                character_voices,
                character_overrides: request.character_overrides.clone(),
            })
            .await
    }

    /// Check a job, rejecting malformed ids before any backend call
    pub async fn check(
        &self,
        synthesis_id: Option<&str>,
        mode: PollMode,
    ) -> SynthesisResult<CheckOutcome> {
        validate_synthesis_id(synthesis_id)?;
        let synthesis_id = synthesis_id.unwrap_or_default();
        self.poller.check(synthesis_id, mode).await
    }

    /// Synthesize a short text in one request and publish the audio
    pub async fn speak_now(
        &self,
        text: Option<&str>,
        voice: Option<&str>,
    ) -> SynthesisResult<SpokenAudio> {
        let settings = &self.settings;
        let text = text.map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(SynthesisError::validation("text is required", "text"));
        }
        let text_length = text.chars().count();
        if text_length > settings.max_sync_text_length {
            return Err(SynthesisError::TextTooLong {
                length: text_length,
                max_length: settings.max_sync_text_length,
            });
        }
        validate_voice(voice)?;
        let voice = non_empty(voice).unwrap_or(settings.default_voice.as_str()).to_string();

        let filename = audio_blob_name(
            &derive_job_id(text, settings.id_word_count, settings.id_max_length),
            &settings.audio_extension,
        );
        info!(filename = %filename, text_length, voice = %voice, "Synchronous synthesis");

        let ssml = build_simple_ssml(text, &voice, None);
        let audio = self
            .synthesizer
            .synthesize(&ssml, &settings.output_format)
            .await
            .map_err(SynthesisError::BackendSubmit)?;
        let size_bytes = audio.len() as u64;

        self.store.put(&filename, audio).await?;
        let url = self
            .store
            .sign_url(&filename, settings.signed_url_expiry())
            .await?;

        Ok(SpokenAudio {
            url,
            filename,
            voice,
            size_bytes,
            text_length,
        })
    }
}
