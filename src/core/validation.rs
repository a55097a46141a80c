//! Request validation for the synthesis endpoints.
//!
//! Every check returns `Ok(())` or a [`SynthesisError::Validation`] naming the
//! offending field. Optional inputs pass when absent.

use once_cell::sync::Lazy;
use regex::Regex;

use super::catalog::{all_styles, find_preset, preset_names};
use super::error::{SynthesisError, SynthesisResult};
use super::naming::is_valid_job_id;

static VOICE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2,3}-[A-Z]{2}-\w+Neural$").unwrap());

/// Maximum length of a client supplied title
pub const MAX_TITLE_LENGTH: usize = 200;

pub fn validate_text(
    text: Option<&str>,
    min_length: usize,
    max_length: usize,
) -> SynthesisResult<()> {
    let Some(text) = text else {
        return Err(SynthesisError::validation("text is required", "text"));
    };

    let length = text.trim().chars().count();
    if length < min_length {
        return Err(SynthesisError::validation(
            format!("text must be at least {min_length} characters"),
            "text",
        ));
    }
    if length > max_length {
        return Err(SynthesisError::validation(
            format!("text must not exceed {max_length} characters"),
            "text",
        ));
    }

    Ok(())
}

pub fn validate_voice(voice: Option<&str>) -> SynthesisResult<()> {
    match voice {
        Some(voice) if !voice.is_empty() && !VOICE_NAME.is_match(voice) => {
            Err(SynthesisError::validation(
                format!(
                    "Invalid voice format: {voice}. Expected format: 'en-US-VoiceNameNeural'"
                ),
                "voice",
            ))
        }
        _ => Ok(()),
    }
}

/// Style must be known to at least one catalogue voice.
///
/// Voice/style compatibility is not enforced: the backend falls back to the
/// neutral style for combinations it does not support.
pub fn validate_style(style: Option<&str>) -> SynthesisResult<()> {
    let Some(style) = style.filter(|s| !s.is_empty()) else {
        return Ok(());
    };

    let styles = all_styles();
    if !styles.contains(&style) {
        return Err(SynthesisError::validation(
            format!(
                "Invalid style: {style}. Available styles: {}",
                styles.join(", ")
            ),
            "style",
        ));
    }

    Ok(())
}

pub fn validate_preset(preset: Option<&str>) -> SynthesisResult<()> {
    let Some(preset) = preset.filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    if find_preset(preset).is_none() {
        return Err(SynthesisError::validation(
            format!(
                "Invalid preset: {preset}. Available presets: {}",
                preset_names().join(", ")
            ),
            "preset",
        ));
    }

    Ok(())
}

pub fn validate_title(title: Option<&str>) -> SynthesisResult<()> {
    match title {
        Some(title) if title.chars().count() > MAX_TITLE_LENGTH => Err(SynthesisError::validation(
            format!("Title must not exceed {MAX_TITLE_LENGTH} characters"),
            "title",
        )),
        _ => Ok(()),
    }
}

pub fn validate_synthesis_id(synthesis_id: Option<&str>) -> SynthesisResult<()> {
    match synthesis_id {
        None | Some("") => Err(SynthesisError::validation(
            "synthesis_id is required",
            "synthesis_id",
        )),
        Some(id) if !is_valid_job_id(id) => Err(SynthesisError::validation(
            "Invalid synthesis_id format",
            "synthesis_id",
        )),
        Some(_) => Ok(()),
    }
}

/// Inputs of a batch start request that need checking
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchStartInput<'a> {
    pub text: Option<&'a str>,
    pub voice: Option<&'a str>,
    pub style: Option<&'a str>,
    pub preset: Option<&'a str>,
    pub title: Option<&'a str>,
}

/// Validate a batch start request, returning the first failing check
pub fn validate_batch_start_request(
    input: &BatchStartInput<'_>,
    min_length: usize,
    max_length: usize,
) -> SynthesisResult<()> {
    validate_text(input.text, min_length, max_length)?;
    validate_voice(input.voice)?;
    validate_style(input.style)?;
    validate_preset(input.preset)?;
    validate_title(input.title)?;
    Ok(())
}
