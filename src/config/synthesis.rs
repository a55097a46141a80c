use std::time::Duration;

/// Narration and job-handling settings.
///
/// Built once at startup and handed to each workflow component. Tests build
/// their own copies with short intervals instead of touching globals.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisSettings {
    /// Voice used when the request names neither a voice nor a preset
    pub default_voice: String,
    /// Speaking style used when the request does not name one (`None` = plain)
    pub default_style: Option<String>,

    /// Voice for narration in multi-voice stories
    pub narrator_voice: String,
    pub narrator_style: Option<String>,
    /// Parse dialogue and give characters their own voices by default
    pub enable_character_voices: bool,

    /// Backend output format (e.g. `audio-24khz-96kbitrate-mono-mp3`)
    pub output_format: String,
    /// Extension of published audio blobs
    pub audio_extension: String,

    /// Validity window of signed download links
    pub signed_url_expiry_hours: u64,
    /// How long the backend keeps the job and its result
    pub synthesis_ttl_hours: u64,

    /// Number of leading words used for the descriptive id slug
    pub id_word_count: usize,
    /// Maximum length of the descriptive id slug
    pub id_max_length: usize,

    /// Wait between two status queries
    pub poll_interval: Duration,
    /// Status queries per check call
    pub max_poll_attempts: u32,

    pub min_text_length: usize,
    pub max_batch_text_length: usize,
    pub max_sync_text_length: usize,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            default_voice: "en-US-GuyNeural".to_string(),
            default_style: Some("hopeful".to_string()),
            narrator_voice: "en-US-GuyNeural".to_string(),
            narrator_style: Some("friendly".to_string()),
            enable_character_voices: false,
            output_format: "audio-24khz-96kbitrate-mono-mp3".to_string(),
            audio_extension: "mp3".to_string(),
            signed_url_expiry_hours: 48,
            synthesis_ttl_hours: 24,
            id_word_count: 6,
            id_max_length: 50,
            poll_interval: Duration::from_secs(10),
            max_poll_attempts: 18,
            min_text_length: 1,
            max_batch_text_length: 100_000,
            max_sync_text_length: 5_000,
        }
    }
}

impl SynthesisSettings {
    /// Longest a single waiting check call may sleep in total
    pub fn poll_budget(&self) -> Duration {
        self.poll_interval * self.max_poll_attempts
    }

    pub fn signed_url_expiry(&self) -> Duration {
        Duration::from_secs(self.signed_url_expiry_hours * 3600)
    }
}
