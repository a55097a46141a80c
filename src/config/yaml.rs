use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration; anything left out
/// falls back to environment variables and then to built-in defaults.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 7071
///
/// speech:
///   subscription_key: "your-speech-key"
///   region: "eastus"
///
/// storage:
///   account_name: "storyaudio"
///   account_key: "base64-account-key"
///   container: "audio-files"
///
/// auth:
///   required: true
///   api_secrets:
///     - id: "shortcut"
///       secret: "first-secret"
///     - id: "web"
///       secret: "second-secret"
///
/// synthesis:
///   default_voice: "en-US-JennyNeural"
///   default_style: "none"
///   poll_interval_seconds: 10
///   max_poll_attempts: 18
///   signed_url_expiry_hours: 48
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub speech: Option<SpeechYaml>,
    pub storage: Option<StorageYaml>,
    pub auth: Option<AuthYaml>,
    pub synthesis: Option<SynthesisYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Speech service credentials from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SpeechYaml {
    /// Speech resource key (Azure Portal: Keys and Endpoint)
    pub subscription_key: Option<String>,
    /// Region the Speech resource is deployed in (e.g. "eastus")
    pub region: Option<String>,
    /// Explicit base URL, replaces the region-derived host
    pub endpoint: Option<String>,
}

/// Blob storage settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageYaml {
    pub account_name: Option<String>,
    pub account_key: Option<String>,
    pub container: Option<String>,
}

/// Authentication configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthYaml {
    pub required: Option<bool>,
    /// Single secret shorthand, registered under the id "default"
    pub api_secret: Option<String>,
    pub api_secrets: Vec<ApiSecretYaml>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSecretYaml {
    pub id: String,
    pub secret: String,
}

/// Synthesis tuning from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SynthesisYaml {
    pub default_voice: Option<String>,
    pub default_style: Option<String>,
    pub narrator_voice: Option<String>,
    pub narrator_style: Option<String>,
    pub enable_character_voices: Option<bool>,
    pub output_format: Option<String>,
    pub audio_extension: Option<String>,
    pub signed_url_expiry_hours: Option<u64>,
    pub synthesis_ttl_hours: Option<u64>,
    pub id_word_count: Option<usize>,
    pub id_max_length: Option<usize>,
    pub poll_interval_seconds: Option<u64>,
    pub max_poll_attempts: Option<u32>,
    pub max_batch_text_length: Option<usize>,
    pub max_sync_text_length: Option<usize>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
