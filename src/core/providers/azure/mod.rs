//! Azure Speech Services endpoints and authentication.
//!
//! All calls authenticate with the resource subscription key in the
//! `Ocp-Apim-Subscription-Key` header. Endpoints come from the configured
//! region unless an explicit endpoint overrides them (sovereign clouds, tests).

pub mod region;

pub use region::{AzureRegion, BATCH_SYNTHESIS_REGIONS, DEFAULT_REGION, InvalidRegion};

use tracing::warn;

use crate::config::SpeechCredentials;

/// Subscription key header used by every Speech API call
pub const AZURE_SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Resolved Speech API endpoints for one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechEndpoints {
    /// Base for `/texttospeech/batchsyntheses`
    pub api_base_url: String,
    /// Synchronous synthesis endpoint
    pub tts_rest_url: String,
}

impl SpeechEndpoints {
    /// An explicit endpoint wins over the region.
    ///
    /// ```rust
    /// use tonisynth::core::providers::azure::SpeechEndpoints;
    ///
    /// let endpoints = SpeechEndpoints::resolve(Some("eastus"), Some("http://127.0.0.1:9000/"));
    /// assert_eq!(endpoints.api_base_url, "http://127.0.0.1:9000");
    /// assert_eq!(endpoints.tts_rest_url, "http://127.0.0.1:9000/cognitiveservices/v1");
    /// ```
    pub fn resolve(region: Option<&str>, endpoint: Option<&str>) -> Self {
        match endpoint.map(|e| e.trim().trim_end_matches('/')).filter(|e| !e.is_empty()) {
            Some(endpoint) => Self {
                api_base_url: endpoint.to_string(),
                tts_rest_url: format!("{endpoint}/cognitiveservices/v1"),
            },
            None => {
                let region = match region.filter(|r| !r.trim().is_empty()) {
                    None => AzureRegion::default(),
                    Some(raw) => raw.parse::<AzureRegion>().unwrap_or_else(|e| {
                        warn!(error = %e, fallback = DEFAULT_REGION, "Ignoring speech region");
                        AzureRegion::default()
                    }),
                };
                if !region.hosts_batch_synthesis() {
                    warn!(region = %region, "Region is not known to host batch synthesis");
                }
                Self {
                    api_base_url: region.api_base_url(),
                    tts_rest_url: region.tts_rest_url(),
                }
            }
        }
    }

    pub fn from_credentials(credentials: &SpeechCredentials) -> Self {
        Self::resolve(
            credentials.region.as_deref(),
            credentials.endpoint.as_deref(),
        )
    }
}
