//! Synchronous speech synthesis for short texts.
//!
//! One POST returns the audio directly; no job is created.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::error::BackendError;
use super::providers::azure::{AZURE_SUBSCRIPTION_KEY_HEADER, SpeechEndpoints};
use crate::config::SpeechCredentials;

const USER_AGENT: &str = "tonisynth";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Render an SSML document to audio in `output_format`
    async fn synthesize(&self, ssml: &str, output_format: &str) -> Result<Bytes, BackendError>;
}

/// Azure text-to-speech REST endpoint
#[derive(Debug, Clone)]
pub struct AzureSpeechClient {
    client: reqwest::Client,
    url: String,
    subscription_key: String,
}

impl AzureSpeechClient {
    pub fn new(url: impl Into<String>, subscription_key: impl Into<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            subscription_key: subscription_key.into(),
        })
    }

    pub fn from_credentials(credentials: &SpeechCredentials) -> Result<Self, BackendError> {
        let endpoints = SpeechEndpoints::from_credentials(credentials);
        Self::new(endpoints.tts_rest_url, credentials.subscription_key.clone())
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeechClient {
    async fn synthesize(&self, ssml: &str, output_format: &str) -> Result<Bytes, BackendError> {
        let response = self
            .client
            .post(&self.url)
            .header(AZURE_SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .header("Content-Type", "application/ssml+xml")
            .header(OUTPUT_FORMAT_HEADER, output_format)
            .header("User-Agent", USER_AGENT)
            .body(ssml.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BackendError::Http {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let audio = response.bytes().await?;
        debug!(size_bytes = audio.len(), "Synthesized audio");
        Ok(audio)
    }
}

/// Returns fixed audio bytes and remembers the last document it was given
#[derive(Debug, Default)]
pub struct StaticSynthesizer {
    audio: Bytes,
    last_ssml: tokio::sync::Mutex<Option<String>>,
}

impl StaticSynthesizer {
    pub fn new(audio: impl Into<Bytes>) -> Self {
        Self {
            audio: audio.into(),
            last_ssml: Default::default(),
        }
    }

    pub async fn last_ssml(&self) -> Option<String> {
        self.last_ssml.lock().await.clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for StaticSynthesizer {
    async fn synthesize(&self, ssml: &str, _output_format: &str) -> Result<Bytes, BackendError> {
        *self.last_ssml.lock().await = Some(ssml.to_string());
        Ok(self.audio.clone())
    }
}
