//! Azure Speech region identifiers and the hosts derived from them.
//!
//! ```rust
//! use tonisynth::core::providers::azure::AzureRegion;
//!
//! let region: AzureRegion = " WestEurope ".parse().unwrap();
//! assert_eq!(region.as_str(), "westeurope");
//! assert_eq!(region.api_base_url(), "https://westeurope.api.cognitive.microsoft.com");
//! assert!("west europe".parse::<AzureRegion>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

/// Regions that host the batch synthesis API.
///
/// See: <https://learn.microsoft.com/en-us/azure/ai-services/speech-service/regions>
pub const BATCH_SYNTHESIS_REGIONS: &[&str] = &[
    "australiaeast",
    "canadacentral",
    "centralindia",
    "eastus",
    "eastus2",
    "francecentral",
    "japaneast",
    "northeurope",
    "southcentralus",
    "southeastasia",
    "swedencentral",
    "uksouth",
    "westeurope",
    "westus",
    "westus2",
    "westus3",
];

pub const DEFAULT_REGION: &str = "eastus";

/// Lowercase region id such as `eastus`.
///
/// Any well-formed id is accepted so new regions work without a release;
/// [`AzureRegion::hosts_batch_synthesis`] tells whether it is a known one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AzureRegion(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid Azure region '{0}': expected a lowercase id like 'eastus'")]
pub struct InvalidRegion(pub String);

impl AzureRegion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn hosts_batch_synthesis(&self) -> bool {
        BATCH_SYNTHESIS_REGIONS.contains(&self.0.as_str())
    }

    /// `https://<region>.api.cognitive.microsoft.com`
    pub fn api_base_url(&self) -> String {
        format!("https://{}.api.cognitive.microsoft.com", self.0)
    }

    /// `https://<region>.tts.speech.microsoft.com/cognitiveservices/v1`
    pub fn tts_rest_url(&self) -> String {
        format!("https://{}.tts.speech.microsoft.com/cognitiveservices/v1", self.0)
    }
}

impl Default for AzureRegion {
    fn default() -> Self {
        Self(DEFAULT_REGION.to_string())
    }
}

impl FromStr for AzureRegion {
    type Err = InvalidRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidRegion(s.to_string()));
        }
        Ok(Self(id))
    }
}

impl fmt::Display for AzureRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
