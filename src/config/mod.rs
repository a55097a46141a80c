//! Configuration module for the tonisynth server
//!
//! Configuration comes from YAML files and environment variables. When a YAML
//! file is given its values win over the environment; anything missing from both
//! falls back to built-in defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `synthesis`: Narration and polling settings
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use tonisynth::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variables filling the gaps
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod synthesis;
mod utils;
mod validation;
mod yaml;

pub use synthesis::SynthesisSettings;
pub use utils::parse_bool;

/// Container used when none is configured
pub const DEFAULT_STORAGE_CONTAINER: &str = "audio-files";

/// An accepted API secret and the client id it authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthApiSecret {
    pub id: String,
    pub secret: String,
}

impl AuthApiSecret {
    /// Entry for a secret configured without an explicit id
    pub fn default_id(secret: impl Into<String>) -> Self {
        Self {
            id: "default".to_string(),
            secret: secret.into(),
        }
    }
}

/// Speech service credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechCredentials {
    pub subscription_key: String,
    pub region: Option<String>,
    /// Explicit base URL, replaces the region-derived host
    pub endpoint: Option<String>,
}

/// Blob storage credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCredentials {
    pub account_name: String,
    pub account_key: String,
    pub container: String,
}

/// Server configuration
///
/// Contains all configuration needed to run the server:
/// - Server settings (host, port)
/// - Speech service and blob storage credentials
/// - Authentication settings
/// - Synthesis settings (voices, polling, link expiry)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Speech service
    pub speech_subscription_key: Option<String>,
    pub speech_region: Option<String>,
    pub speech_endpoint: Option<String>,

    // Blob storage
    pub storage_account_name: Option<String>,
    pub storage_account_key: Option<String>,
    pub storage_container: String,

    // Authentication configuration
    pub auth_api_secrets: Vec<AuthApiSecret>,
    pub auth_required: bool,

    pub synthesis: SynthesisSettings,
}

impl ServerConfig {
    /// Load configuration from a YAML file merged with environment variables
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables
    /// 3. Default values
    ///
    /// The `.env` file is not read here; only real environment variables fill
    /// gaps left by the YAML file.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        config.validate()?;

        Ok(config)
    }

    /// Run all configuration checks
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        validation::validate_api_secrets(&self.auth_api_secrets)?;
        validation::validate_auth_required(self.auth_required, &self.auth_api_secrets)?;
        validation::validate_synthesis_settings(&self.synthesis)?;
        Ok(())
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if API secret authentication is configured
    pub fn has_api_secret_auth(&self) -> bool {
        !self.auth_api_secrets.is_empty()
    }

    /// Speech credentials, or an error naming the missing variables
    ///
    /// A key plus either a region or an explicit endpoint is required.
    pub fn speech_credentials(&self) -> Result<SpeechCredentials, String> {
        let mut missing = Vec::new();
        if self.speech_subscription_key.is_none() {
            missing.push("SPEECH_SERVICE_KEY");
        }
        if self.speech_region.is_none() && self.speech_endpoint.is_none() {
            missing.push("SPEECH_SERVICE_REGION");
        }
        if !missing.is_empty() {
            return Err(format!(
                "Speech service is not configured. Missing: {}",
                missing.join(", ")
            ));
        }

        Ok(SpeechCredentials {
            subscription_key: self.speech_subscription_key.clone().unwrap_or_default(),
            region: self.speech_region.clone(),
            endpoint: self.speech_endpoint.clone(),
        })
    }

    /// Storage credentials, or an error naming the missing variables
    pub fn storage_credentials(&self) -> Result<StorageCredentials, String> {
        match (&self.storage_account_name, &self.storage_account_key) {
            (Some(account_name), Some(account_key)) => Ok(StorageCredentials {
                account_name: account_name.clone(),
                account_key: account_key.clone(),
                container: self.storage_container.clone(),
            }),
            (name, key) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push("STORAGE_ACCOUNT_NAME");
                }
                if key.is_none() {
                    missing.push("STORAGE_ACCOUNT_KEY");
                }
                Err(format!(
                    "Blob storage is not configured. Missing: {}",
                    missing.join(", ")
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn base_config() -> ServerConfig {
        ServerConfig {
            host: "localhost".to_string(),
            port: 7071,
            speech_subscription_key: None,
            speech_region: None,
            speech_endpoint: None,
            storage_account_name: None,
            storage_account_key: None,
            storage_container: DEFAULT_STORAGE_CONTAINER.to_string(),
            auth_api_secrets: Vec::new(),
            auth_required: false,
            synthesis: SynthesisSettings::default(),
        }
    }

    #[test]
    fn test_speech_credentials_missing() {
        let config = base_config();
        let err = config.speech_credentials().unwrap_err();
        assert!(err.contains("SPEECH_SERVICE_KEY"));
        assert!(err.contains("SPEECH_SERVICE_REGION"));
    }

    #[test]
    fn test_speech_credentials_endpoint_replaces_region() {
        let config = ServerConfig {
            speech_subscription_key: Some("key".to_string()),
            speech_endpoint: Some("http://localhost:9000".to_string()),
            ..base_config()
        };
        let creds = config.speech_credentials().unwrap();
        assert_eq!(creds.subscription_key, "key");
        assert!(creds.region.is_none());
        assert_eq!(creds.endpoint.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_storage_credentials() {
        let config = ServerConfig {
            storage_account_name: Some("storyaudio".to_string()),
            ..base_config()
        };
        let err = config.storage_credentials().unwrap_err();
        assert!(err.contains("STORAGE_ACCOUNT_KEY"));
        assert!(!err.contains("STORAGE_ACCOUNT_NAME"));

        let config = ServerConfig {
            storage_account_key: Some("a2V5".to_string()),
            ..config
        };
        let creds = config.storage_credentials().unwrap();
        assert_eq!(creds.container, "audio-files");
    }

    #[test]
    fn test_has_api_secret_auth() {
        let mut config = base_config();
        assert!(!config.has_api_secret_auth());
        config.auth_api_secrets.push(AuthApiSecret::default_id("s"));
        assert!(config.has_api_secret_auth());
    }

    fn cleanup_env_vars() {
        unsafe {
            std::env::remove_var("HOST");
            std::env::remove_var("PORT");
            std::env::remove_var("AUTH_REQUIRED");
            std::env::remove_var("AUTH_API_SECRET");
            std::env::remove_var("SPEECH_SERVICE_REGION");
        }
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_only() {
        cleanup_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            r#"
server:
  host: "127.0.0.1"
  port: 8080
speech:
  subscription_key: "yaml-key"
  region: "westus2"
synthesis:
  default_style: "none"
  max_poll_attempts: 3
"#,
        )
        .unwrap();

        let config = ServerConfig::from_file(&config_path).unwrap();
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.speech_region.as_deref(), Some("westus2"));
        assert_eq!(config.synthesis.default_style, None);
        assert_eq!(config.synthesis.max_poll_attempts, 3);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_env_fills_gaps() {
        cleanup_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "server:\n  port: 8080\n").unwrap();

        unsafe {
            std::env::set_var("HOST", "10.1.1.1");
            std::env::set_var("PORT", "9999");
            std::env::set_var("SPEECH_SERVICE_REGION", "eastus");
        }

        let config = ServerConfig::from_file(&config_path).unwrap();
        assert_eq!(config.host, "10.1.1.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.speech_region.as_deref(), Some("eastus"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_with_auth() {
        cleanup_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            "auth:\n  required: true\n  api_secret: \"yaml-secret\"\n",
        )
        .unwrap();

        let config = ServerConfig::from_file(&config_path).unwrap();
        assert!(config.auth_required);
        assert_eq!(
            config.auth_api_secrets,
            vec![AuthApiSecret::default_id("yaml-secret")]
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_auth_required_without_secret() {
        cleanup_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "auth:\n  required: true\n").unwrap();

        assert!(ServerConfig::from_file(&config_path).is_err());

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        let result = ServerConfig::from_file(&PathBuf::from("/nonexistent/config.yaml"));
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_file_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "server: [not, a, map").unwrap();

        let result = ServerConfig::from_file(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse YAML config")
        );
    }
}
