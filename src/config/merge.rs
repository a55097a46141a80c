use std::env;
use std::time::Duration;

use super::synthesis::SynthesisSettings;
use super::utils::{parse_bool, parse_number, parse_optional_style};
use super::yaml::YamlConfig;
use super::{AuthApiSecret, DEFAULT_STORAGE_CONTAINER, ServerConfig};

/// Merge YAML configuration with environment variables
///
/// Priority order (highest to lowest):
/// 1. YAML configuration values
/// 2. Environment variables
/// 3. Default values
///
/// # Arguments
/// * `yaml_config` - Optional YAML configuration to use as overrides
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();

    // Helper macro to get value with priority: YAML > ENV > Default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            $yaml_value
                .or_else(|| env::var($env_var).ok())
                .unwrap_or_else(|| $default.to_string())
        };
    }

    // Helper macro for optional values: YAML > ENV
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            $yaml_value.or_else(|| env::var($env_var).ok())
        };
    }

    // Helper macro for numeric values: YAML > ENV (parsed) > Default
    macro_rules! get_number {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            match $yaml_value {
                Some(value) => value,
                None => match env::var($env_var) {
                    Ok(raw) => parse_number($env_var, &raw)?,
                    Err(_) => $default,
                },
            }
        };
    }

    // Server configuration
    let host = get_value!(
        "HOST",
        yaml.server.as_ref().and_then(|s| s.host.clone()),
        "0.0.0.0"
    );
    let port: u16 = get_number!("PORT", yaml.server.as_ref().and_then(|s| s.port), 7071);

    // Speech service
    let speech_subscription_key = get_optional!(
        "SPEECH_SERVICE_KEY",
        yaml.speech
            .as_ref()
            .and_then(|s| s.subscription_key.clone())
    );
    let speech_region = get_optional!(
        "SPEECH_SERVICE_REGION",
        yaml.speech.as_ref().and_then(|s| s.region.clone())
    );
    let speech_endpoint = get_optional!(
        "SPEECH_ENDPOINT",
        yaml.speech.as_ref().and_then(|s| s.endpoint.clone())
    );

    // Blob storage
    let storage_account_name = get_optional!(
        "STORAGE_ACCOUNT_NAME",
        yaml.storage.as_ref().and_then(|s| s.account_name.clone())
    );
    let storage_account_key = get_optional!(
        "STORAGE_ACCOUNT_KEY",
        yaml.storage.as_ref().and_then(|s| s.account_key.clone())
    );
    let storage_container = get_value!(
        "STORAGE_CONTAINER_NAME",
        yaml.storage.as_ref().and_then(|s| s.container.clone()),
        DEFAULT_STORAGE_CONTAINER
    );

    // Authentication
    let auth_required = yaml
        .auth
        .as_ref()
        .and_then(|a| a.required)
        .or_else(|| env::var("AUTH_REQUIRED").ok().and_then(|s| parse_bool(&s)))
        .unwrap_or(false);

    let auth_api_secrets = match yaml.auth.as_ref() {
        Some(auth) if !auth.api_secrets.is_empty() => auth
            .api_secrets
            .iter()
            .map(|entry| AuthApiSecret {
                id: entry.id.clone(),
                secret: entry.secret.clone(),
            })
            .collect(),
        _ => get_optional!(
            "AUTH_API_SECRET",
            yaml.auth.as_ref().and_then(|a| a.api_secret.clone())
        )
        .filter(|secret| !secret.is_empty())
        .map(|secret| vec![AuthApiSecret::default_id(secret)])
        .unwrap_or_default(),
    };

    let synthesis = merge_synthesis_settings(&yaml)?;

    Ok(ServerConfig {
        host,
        port,
        speech_subscription_key,
        speech_region,
        speech_endpoint,
        storage_account_name,
        storage_account_key,
        storage_container,
        auth_api_secrets,
        auth_required,
        synthesis,
    })
}

/// Merge `SYNTHESIS_*` settings (YAML > ENV > defaults)
fn merge_synthesis_settings(
    yaml: &YamlConfig,
) -> Result<SynthesisSettings, Box<dyn std::error::Error>> {
    let defaults = SynthesisSettings::default();
    let section = yaml.synthesis.clone().unwrap_or_default();

    let string_setting = |yaml_value: Option<String>, env_var: &str, default: &str| {
        yaml_value
            .or_else(|| env::var(env_var).ok())
            .unwrap_or_else(|| default.to_string())
    };

    let style_setting = |yaml_value: Option<String>, env_var: &str, default: &Option<String>| {
        match yaml_value.or_else(|| env::var(env_var).ok()) {
            Some(raw) => parse_optional_style(&raw),
            None => default.clone(),
        }
    };

    fn number<T>(yaml_value: Option<T>, env_var: &str, default: T) -> Result<T, String>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match yaml_value {
            Some(value) => Ok(value),
            None => match env::var(env_var) {
                Ok(raw) => parse_number(env_var, &raw),
                Err(_) => Ok(default),
            },
        }
    }

    let enable_character_voices = section
        .enable_character_voices
        .or_else(|| {
            env::var("SYNTHESIS_CHARACTER_VOICES")
                .ok()
                .and_then(|s| parse_bool(&s))
        })
        .unwrap_or(defaults.enable_character_voices);

    let poll_interval_seconds = number(
        section.poll_interval_seconds,
        "SYNTHESIS_POLL_INTERVAL_SECONDS",
        defaults.poll_interval.as_secs(),
    )?;

    Ok(SynthesisSettings {
        default_voice: string_setting(
            section.default_voice,
            "SYNTHESIS_DEFAULT_VOICE",
            &defaults.default_voice,
        ),
        default_style: style_setting(
            section.default_style,
            "SYNTHESIS_DEFAULT_STYLE",
            &defaults.default_style,
        ),
        narrator_voice: string_setting(
            section.narrator_voice,
            "SYNTHESIS_NARRATOR_VOICE",
            &defaults.narrator_voice,
        ),
        narrator_style: style_setting(
            section.narrator_style,
            "SYNTHESIS_NARRATOR_STYLE",
            &defaults.narrator_style,
        ),
        enable_character_voices,
        output_format: string_setting(
            section.output_format,
            "SYNTHESIS_OUTPUT_FORMAT",
            &defaults.output_format,
        ),
        audio_extension: string_setting(
            section.audio_extension,
            "SYNTHESIS_AUDIO_EXTENSION",
            &defaults.audio_extension,
        ),
        signed_url_expiry_hours: number(
            section.signed_url_expiry_hours,
            "SYNTHESIS_URL_EXPIRY_HOURS",
            defaults.signed_url_expiry_hours,
        )?,
        synthesis_ttl_hours: number(
            section.synthesis_ttl_hours,
            "SYNTHESIS_TTL_HOURS",
            defaults.synthesis_ttl_hours,
        )?,
        id_word_count: number(
            section.id_word_count,
            "SYNTHESIS_ID_WORD_COUNT",
            defaults.id_word_count,
        )?,
        id_max_length: number(
            section.id_max_length,
            "SYNTHESIS_ID_MAX_LENGTH",
            defaults.id_max_length,
        )?,
        poll_interval: Duration::from_secs(poll_interval_seconds),
        max_poll_attempts: number(
            section.max_poll_attempts,
            "SYNTHESIS_MAX_POLL_ATTEMPTS",
            defaults.max_poll_attempts,
        )?,
        min_text_length: defaults.min_text_length,
        max_batch_text_length: number(
            section.max_batch_text_length,
            "SYNTHESIS_MAX_BATCH_TEXT_LENGTH",
            defaults.max_batch_text_length,
        )?,
        max_sync_text_length: number(
            section.max_sync_text_length,
            "SYNTHESIS_MAX_SYNC_TEXT_LENGTH",
            defaults.max_sync_text_length,
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::yaml::{ApiSecretYaml, AuthYaml, ServerYaml, SynthesisYaml};
    use super::*;
    use serial_test::serial;

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("SPEECH_SERVICE_KEY");
            env::remove_var("SPEECH_SERVICE_REGION");
            env::remove_var("STORAGE_CONTAINER_NAME");
            env::remove_var("AUTH_REQUIRED");
            env::remove_var("AUTH_API_SECRET");
            env::remove_var("SYNTHESIS_DEFAULT_VOICE");
            env::remove_var("SYNTHESIS_DEFAULT_STYLE");
            env::remove_var("SYNTHESIS_POLL_INTERVAL_SECONDS");
            env::remove_var("SYNTHESIS_MAX_POLL_ATTEMPTS");
            env::remove_var("SYNTHESIS_CHARACTER_VOICES");
        }
    }

    #[test]
    #[serial]
    fn test_merge_defaults() {
        cleanup_env_vars();

        let config = merge_config(None).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 7071);
        assert_eq!(config.storage_container, DEFAULT_STORAGE_CONTAINER);
        assert!(!config.auth_required);
        assert!(config.auth_api_secrets.is_empty());
        assert_eq!(config.synthesis, SynthesisSettings::default());

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_yaml_overrides_env() {
        cleanup_env_vars();

        unsafe {
            env::set_var("HOST", "10.0.0.1");
            env::set_var("PORT", "3000");
            env::set_var("SYNTHESIS_MAX_POLL_ATTEMPTS", "6");
        }

        let yaml = YamlConfig {
            server: Some(ServerYaml {
                host: Some("127.0.0.1".to_string()),
                port: None,
            }),
            synthesis: Some(SynthesisYaml {
                max_poll_attempts: Some(30),
                ..Default::default()
            }),
            ..Default::default()
        };

        let config = merge_config(Some(yaml)).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        // not in YAML, so the env value applies
        assert_eq!(config.port, 3000);
        assert_eq!(config.synthesis.max_poll_attempts, 30);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_synthesis_env_overrides() {
        cleanup_env_vars();

        unsafe {
            env::set_var("SYNTHESIS_DEFAULT_VOICE", "en-US-AriaNeural");
            env::set_var("SYNTHESIS_DEFAULT_STYLE", "none");
            env::set_var("SYNTHESIS_POLL_INTERVAL_SECONDS", "2");
            env::set_var("SYNTHESIS_CHARACTER_VOICES", "yes");
        }

        let config = merge_config(None).unwrap();
        assert_eq!(config.synthesis.default_voice, "en-US-AriaNeural");
        assert_eq!(config.synthesis.default_style, None);
        assert_eq!(config.synthesis.poll_interval, Duration::from_secs(2));
        assert!(config.synthesis.enable_character_voices);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_invalid_number() {
        cleanup_env_vars();

        unsafe {
            env::set_var("SYNTHESIS_MAX_POLL_ATTEMPTS", "many");
        }

        let result = merge_config(None);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("SYNTHESIS_MAX_POLL_ATTEMPTS")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_api_secrets() {
        cleanup_env_vars();

        unsafe {
            env::set_var("AUTH_API_SECRET", "env-secret");
        }

        // single env secret gets the default id
        let config = merge_config(None).unwrap();
        assert_eq!(config.auth_api_secrets.len(), 1);
        assert_eq!(config.auth_api_secrets[0].id, "default");
        assert_eq!(config.auth_api_secrets[0].secret, "env-secret");

        // a YAML list replaces it
        let yaml = YamlConfig {
            auth: Some(AuthYaml {
                required: Some(true),
                api_secret: None,
                api_secrets: vec![
                    ApiSecretYaml {
                        id: "shortcut".to_string(),
                        secret: "s1".to_string(),
                    },
                    ApiSecretYaml {
                        id: "web".to_string(),
                        secret: "s2".to_string(),
                    },
                ],
            }),
            ..Default::default()
        };
        let config = merge_config(Some(yaml)).unwrap();
        assert!(config.auth_required);
        assert_eq!(config.auth_api_secrets.len(), 2);
        assert_eq!(config.auth_api_secrets[1].id, "web");

        cleanup_env_vars();
    }
}
