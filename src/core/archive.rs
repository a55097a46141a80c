//! Result bundle extraction.
//!
//! The batch backend delivers a ZIP holding the synthesized audio next to
//! summary JSON files. Only the first `.mp3` or `.wav` entry is kept.

use std::io::{Cursor, Read};

use super::error::{SynthesisError, SynthesisResult};

const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".wav"];

/// Upper bound on what an entry header may make us pre-allocate
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// Audio entry pulled out of a result bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAudio {
    pub name: String,
    pub data: Vec<u8>,
}

/// Buffer capacity for an entry whose header declares `declared` bytes.
/// The header is untrusted; the buffer still grows past this while reading.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOCATION, |size| size.min(MAX_PREALLOCATION))
}

fn is_audio_entry(name: &str) -> bool {
    AUDIO_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// First audio entry of `bundle`, in archive order
pub fn extract_audio(bundle: &[u8]) -> SynthesisResult<ExtractedAudio> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bundle))
        .map_err(|e| SynthesisError::Materialization(format!("Invalid result archive: {e}")))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| SynthesisError::Materialization(format!("Unreadable archive entry: {e}")))?;
        if entry.is_dir() || !is_audio_entry(entry.name()) {
            continue;
        }

        let name = entry.name().to_string();
        let mut data = Vec::with_capacity(initial_capacity(entry.size()));
        entry.read_to_end(&mut data).map_err(|e| {
            SynthesisError::Materialization(format!("Failed to read {name}: {e}"))
        })?;
        return Ok(ExtractedAudio { name, data });
    }

    Err(SynthesisError::Materialization(
        "No audio file found in results".to_string(),
    ))
}
