use super::AuthApiSecret;
use super::synthesis::SynthesisSettings;
use crate::core::naming::MAX_SLUG_LENGTH;

/// Validate that when auth is required, at least one API secret is configured
pub fn validate_auth_required(
    auth_required: bool,
    auth_api_secrets: &[AuthApiSecret],
) -> Result<(), Box<dyn std::error::Error>> {
    if !auth_required {
        return Ok(());
    }

    if auth_api_secrets.is_empty() {
        return Err(
            "When AUTH_REQUIRED=true, AUTH_API_SECRET (or auth.api_secrets in YAML) must be configured"
                .into(),
        );
    }

    Ok(())
}

/// Validate API secret entries
///
/// Ids must be unique and secrets non-empty.
pub fn validate_api_secrets(secrets: &[AuthApiSecret]) -> Result<(), Box<dyn std::error::Error>> {
    let mut seen_ids = std::collections::HashSet::new();
    for entry in secrets {
        if entry.id.trim().is_empty() {
            return Err("API secret id cannot be empty".into());
        }
        if entry.secret.is_empty() {
            return Err(format!("API secret '{}' has an empty secret", entry.id).into());
        }
        if !seen_ids.insert(entry.id.as_str()) {
            return Err(format!("Duplicate API secret id: {}", entry.id).into());
        }
    }

    Ok(())
}

/// Validate synthesis settings
///
/// Rejects values that would break id derivation or the poll loop.
pub fn validate_synthesis_settings(
    settings: &SynthesisSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    if settings.id_word_count == 0 {
        return Err("SYNTHESIS_ID_WORD_COUNT must be at least 1".into());
    }
    if settings.id_max_length == 0 {
        return Err("SYNTHESIS_ID_MAX_LENGTH must be at least 1".into());
    }
    if settings.id_max_length > MAX_SLUG_LENGTH {
        // longer slugs produce ids that batch-check refuses
        return Err(format!("SYNTHESIS_ID_MAX_LENGTH must be at most {MAX_SLUG_LENGTH}").into());
    }
    if settings.max_poll_attempts == 0 {
        return Err("SYNTHESIS_MAX_POLL_ATTEMPTS must be at least 1".into());
    }
    if settings.signed_url_expiry_hours == 0 {
        return Err("SYNTHESIS_URL_EXPIRY_HOURS must be at least 1".into());
    }
    if settings.audio_extension.trim_start_matches('.').is_empty() {
        return Err("SYNTHESIS_AUDIO_EXTENSION cannot be empty".into());
    }
    if settings.max_sync_text_length < settings.min_text_length
        || settings.max_batch_text_length < settings.min_text_length
    {
        return Err("Maximum text lengths must not be below the minimum text length".into());
    }

    Ok(())
}
