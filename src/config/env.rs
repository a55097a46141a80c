use super::ServerConfig;
use super::merge::merge_config;

impl ServerConfig {
    /// Configuration from the process environment, after loading `.env` if one exists.
    ///
    /// Fails on malformed numbers, on `AUTH_REQUIRED` without a secret and on
    /// synthesis settings that would make ids or polling degenerate.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let _ = dotenvy::dotenv();

        let config = merge_config(None)?;
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::time::Duration;

    use serial_test::serial;

    use super::*;

    const VARS: &[&str] = &[
        "AUTH_REQUIRED",
        "AUTH_API_SECRET",
        "HOST",
        "PORT",
        "SPEECH_SERVICE_KEY",
        "SPEECH_SERVICE_REGION",
        "STORAGE_ACCOUNT_NAME",
        "STORAGE_ACCOUNT_KEY",
        "STORAGE_CONTAINER_NAME",
        "SYNTHESIS_ID_WORD_COUNT",
        "SYNTHESIS_POLL_INTERVAL_SECONDS",
    ];

    /// Clears every variable the tests touch, now and on drop
    struct EnvGuard;

    impl EnvGuard {
        fn with(vars: &[(&str, &str)]) -> Self {
            Self::clear();
            for (key, value) in vars {
                unsafe { env::set_var(key, value) };
            }
            EnvGuard
        }

        fn clear() {
            for key in VARS {
                unsafe { env::remove_var(key) };
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            Self::clear();
        }
    }

    fn load_err(vars: &[(&str, &str)]) -> String {
        let _guard = EnvGuard::with(vars);
        ServerConfig::from_env().unwrap_err().to_string()
    }

    #[test]
    #[serial]
    fn test_defaults_without_variables() {
        let _guard = EnvGuard::with(&[]);
        let config = ServerConfig::from_env().unwrap();
        assert!(!config.auth_required);
        assert!(config.auth_api_secrets.is_empty());
        assert_eq!(config.synthesis.poll_interval, Duration::from_secs(10));
        assert_eq!(config.synthesis.max_poll_attempts, 18);
    }

    #[test]
    #[serial]
    fn test_auth_required_spellings() {
        for value in ["true", "1", "yes"] {
            let _guard = EnvGuard::with(&[("AUTH_API_SECRET", "my-secret"), ("AUTH_REQUIRED", value)]);
            let config = ServerConfig::from_env().unwrap();
            assert!(config.auth_required, "AUTH_REQUIRED={value}");
            assert_eq!(config.auth_api_secrets[0].id, "default");
        }
    }

    #[test]
    #[serial]
    fn test_rejections_name_the_variable() {
        assert!(load_err(&[("AUTH_REQUIRED", "true")]).contains("AUTH_API_SECRET"));
        assert!(load_err(&[("PORT", "not-a-port")]).contains("PORT"));
        assert!(load_err(&[("SYNTHESIS_ID_WORD_COUNT", "0")]).contains("WORD_COUNT"));
    }

    #[test]
    #[serial]
    fn test_listener_and_credentials() {
        let _guard = EnvGuard::with(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SPEECH_SERVICE_KEY", "speech-key"),
            ("SPEECH_SERVICE_REGION", "eastus"),
            ("STORAGE_ACCOUNT_NAME", "storyaudio"),
            ("STORAGE_ACCOUNT_KEY", "a2V5"),
            ("STORAGE_CONTAINER_NAME", "stories"),
            ("SYNTHESIS_POLL_INTERVAL_SECONDS", "5"),
        ]);

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.synthesis.poll_interval, Duration::from_secs(5));

        let speech = config.speech_credentials().unwrap();
        assert_eq!(speech.subscription_key, "speech-key");
        assert_eq!(speech.region.as_deref(), Some("eastus"));
        let storage = config.storage_credentials().unwrap();
        assert_eq!(storage.account_name, "storyaudio");
        assert_eq!(storage.container, "stories");
    }
}
