//! Synthesis identifiers and blob names.
//!
//! A synthesis id is a readable slug built from the first words of the story text,
//! followed by an 8 character random suffix:
//!
//! ```rust
//! use tonisynth::core::naming::{derive_job_id, derive_slug};
//!
//! let slug = derive_slug("Once upon a time, a brave dragon...", 6, 50);
//! assert_eq!(slug, "once-upon-a-time-a-brave");
//!
//! let id = derive_job_id("Once upon a time, a brave dragon...", 6, 50);
//! assert!(id.starts_with("once-upon-a-time-a-brave_"));
//! assert_eq!(id.len(), slug.len() + 1 + 8);
//! ```
//!
//! The same id is used as the batch synthesis job id and, with the audio
//! extension appended, as the blob name of the published audio.

use uuid::Uuid;

/// Slug used when the text yields no usable characters.
pub const FALLBACK_SLUG: &str = "story";

/// Separator between the descriptive slug and the random suffix.
pub const SUFFIX_SEPARATOR: char = '_';

/// Length of the random suffix.
pub const SUFFIX_LENGTH: usize = 8;

/// Shortest id accepted back from clients.
pub const MIN_JOB_ID_LENGTH: usize = 10;

/// Longest id accepted back from clients.
pub const MAX_JOB_ID_LENGTH: usize = 100;

/// Longest slug whose id still passes [`is_valid_job_id`].
pub const MAX_SLUG_LENGTH: usize = MAX_JOB_ID_LENGTH - 1 - SUFFIX_LENGTH;

/// Build the descriptive slug for a text.
///
/// Takes the first `word_count` whitespace separated words, lowercases them, drops
/// everything that is not an ASCII letter or digit, joins the remaining words with
/// hyphens and truncates the result to `max_length` characters. Truncation may cut a
/// word in half; a hyphen left dangling at the end is removed. The fallback slug is
/// truncated too, but never below one character.
pub fn derive_slug(text: &str, word_count: usize, max_length: usize) -> String {
    let words: Vec<String> = text
        .split_whitespace()
        .take(word_count)
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();

    let mut slug = words.join("-");
    // ASCII only, so byte length == char count
    slug.truncate(max_length);
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG[..max_length.clamp(1, FALLBACK_SLUG.len())].to_string()
    } else {
        slug.to_string()
    }
}

/// Generate the random suffix (first 8 hex digits of a v4 UUID).
fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..SUFFIX_LENGTH].to_string()
}

/// Derive a fresh synthesis id: `"{slug}_{suffix}"`.
///
/// Two calls with the same text share the slug but not the suffix.
pub fn derive_job_id(text: &str, word_count: usize, max_length: usize) -> String {
    format!(
        "{}{}{}",
        derive_slug(text, word_count, max_length),
        SUFFIX_SEPARATOR,
        random_suffix()
    )
}

/// Blob name under which the audio of `job_id` is published.
pub fn audio_blob_name(job_id: &str, extension: &str) -> String {
    format!("{}.{}", job_id, extension.trim_start_matches('.'))
}

/// Split an id into its slug and suffix parts, if it has the expected shape.
pub fn split_job_id(job_id: &str) -> Option<(&str, &str)> {
    let (slug, suffix) = job_id.rsplit_once(SUFFIX_SEPARATOR)?;
    if slug.is_empty() || suffix.len() != SUFFIX_LENGTH {
        return None;
    }
    Some((slug, suffix))
}

/// Check that a client supplied id is safe to forward to the backend.
///
/// Accepts 10 to 100 characters of ASCII letters, digits, `-` and `_`.
pub fn is_valid_job_id(job_id: &str) -> bool {
    (MIN_JOB_ID_LENGTH..=MAX_JOB_ID_LENGTH).contains(&job_id.len())
        && job_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
