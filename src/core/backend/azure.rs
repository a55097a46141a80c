//! Azure Batch Synthesis API client.
//!
//! - `PUT  {base}/texttospeech/batchsyntheses/{id}?api-version=2024-04-01` creates a job
//! - `GET  {base}/texttospeech/batchsyntheses/{id}?api-version=2024-04-01` reports status
//! - `GET  {outputs.result}` downloads the ZIP bundle
//!
//! See: <https://learn.microsoft.com/en-us/azure/ai-services/speech-service/batch-synthesis>

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{BackendJobStatus, JobRequest, StatusReport, SynthesisBackend};
use crate::config::SpeechCredentials;
use crate::core::error::BackendError;
use crate::core::providers::azure::{AZURE_SUBSCRIPTION_KEY_HEADER, SpeechEndpoints};

pub const BATCH_API_VERSION: &str = "2024-04-01";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchSynthesisRequest<'a> {
    description: &'a str,
    input_kind: &'static str,
    inputs: [BatchInput<'a>; 1],
    properties: BatchRequestProperties<'a>,
}

#[derive(Debug, Serialize)]
struct BatchInput<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequestProperties<'a> {
    output_format: &'a str,
    concatenate_result: bool,
    time_to_live_in_hours: u64,
}

#[derive(Debug, Deserialize)]
struct BatchSynthesisResponse {
    status: String,
    #[serde(default)]
    outputs: Option<BatchOutputs>,
    #[serde(default)]
    properties: Option<BatchResponseProperties>,
}

#[derive(Debug, Deserialize)]
struct BatchOutputs {
    #[serde(default)]
    result: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchResponseProperties {
    #[serde(default)]
    duration_in_milliseconds: Option<u64>,
    #[serde(default)]
    size_in_bytes: Option<u64>,
    #[serde(default)]
    failure_reason: Option<String>,
    #[serde(default)]
    error: Option<BatchErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct BatchErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl From<BatchSynthesisResponse> for StatusReport {
    fn from(response: BatchSynthesisResponse) -> Self {
        let properties = response.properties.unwrap_or_default();
        let failure_reason = properties
            .failure_reason
            .or_else(|| properties.error.and_then(|e| e.message));

        StatusReport {
            status: BackendJobStatus::parse(&response.status),
            result_url: response.outputs.and_then(|o| o.result),
            failure_reason,
            duration_ms: properties.duration_in_milliseconds,
            size_bytes: properties.size_in_bytes,
        }
    }
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Turn a non-success response into an `Http` error carrying a capped body
async fn http_error(response: reqwest::Response) -> BackendError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    BackendError::Http {
        status,
        body: truncate_body(&body),
    }
}

/// Batch synthesis client authenticated with a subscription key
#[derive(Debug, Clone)]
pub struct AzureBatchClient {
    client: reqwest::Client,
    base_url: String,
    subscription_key: String,
}

impl AzureBatchClient {
    pub fn new(
        base_url: impl Into<String>,
        subscription_key: impl Into<String>,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            subscription_key: subscription_key.into(),
        })
    }

    pub fn from_credentials(credentials: &SpeechCredentials) -> Result<Self, BackendError> {
        let endpoints = SpeechEndpoints::from_credentials(credentials);
        Self::new(endpoints.api_base_url, credentials.subscription_key.clone())
    }

    fn job_url(&self, job_id: &str) -> String {
        format!(
            "{}/texttospeech/batchsyntheses/{}?api-version={}",
            self.base_url, job_id, BATCH_API_VERSION
        )
    }
}

#[async_trait]
impl SynthesisBackend for AzureBatchClient {
    async fn create_job(&self, job_id: &str, request: &JobRequest) -> Result<(), BackendError> {
        let body = BatchSynthesisRequest {
            description: &request.description,
            input_kind: "SSML",
            inputs: [BatchInput {
                content: &request.markup,
            }],
            properties: BatchRequestProperties {
                output_format: &request.output_format,
                concatenate_result: true,
                time_to_live_in_hours: request.ttl_hours,
            },
        };

        let response = self
            .client
            .put(self.job_url(job_id))
            .header(AZURE_SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        info!(synthesis_id = %job_id, status = %response.status(), "Batch synthesis created");
        Ok(())
    }

    async fn get_status(&self, job_id: &str) -> Result<StatusReport, BackendError> {
        let response = self
            .client
            .get(self.job_url(job_id))
            .header(AZURE_SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let body = response.text().await?;
        let parsed: BatchSynthesisResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::Protocol(format!("status response: {e}")))?;
        debug!(synthesis_id = %job_id, status = %parsed.status, "Batch synthesis status");

        Ok(parsed.into())
    }

    async fn fetch_result(&self, result_ref: &str) -> Result<Bytes, BackendError> {
        let response = self
            .client
            .get(result_ref)
            .header(AZURE_SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let bytes = response.bytes().await?;
        debug!(size_bytes = bytes.len(), "Downloaded synthesis result bundle");
        Ok(bytes)
    }
}
