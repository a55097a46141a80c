//! Voices, speaking styles and story presets offered to clients.

use serde::Serialize;

const STANDARD_STYLES: &[&str] = &[
    "angry",
    "cheerful",
    "excited",
    "friendly",
    "hopeful",
    "sad",
    "shouting",
    "terrified",
    "unfriendly",
    "whispering",
];

const GUY_STYLES: &[&str] = &[
    "angry",
    "cheerful",
    "excited",
    "friendly",
    "hopeful",
    "newscast",
    "sad",
    "shouting",
    "terrified",
    "unfriendly",
    "whispering",
];

const JENNY_STYLES: &[&str] = &[
    "angry",
    "assistant",
    "chat",
    "cheerful",
    "customerservice",
    "excited",
    "friendly",
    "hopeful",
    "newscast",
    "sad",
    "shouting",
    "terrified",
    "unfriendly",
    "whispering",
];

/// Expressive voices and the speaking styles each supports
pub const VOICE_STYLES: &[(&str, &[&str])] = &[
    ("en-US-AriaNeural", STANDARD_STYLES),
    ("en-US-DavisNeural", STANDARD_STYLES),
    ("en-US-GuyNeural", GUY_STYLES),
    ("en-US-JennyNeural", JENNY_STYLES),
    ("en-US-SaraNeural", STANDARD_STYLES),
];

/// Named voice/style combination for a kind of story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoryPreset {
    pub name: &'static str,
    pub voice: &'static str,
    pub style: Option<&'static str>,
}

pub const STORY_PRESETS: &[StoryPreset] = &[
    StoryPreset {
        name: "bedtime",
        voice: "en-US-JennyNeural",
        style: None,
    },
    StoryPreset {
        name: "adventure",
        voice: "en-US-DavisNeural",
        style: Some("excited"),
    },
    StoryPreset {
        name: "gentle",
        voice: "en-US-AriaNeural",
        style: Some("friendly"),
    },
    StoryPreset {
        name: "cheerful",
        voice: "en-US-SaraNeural",
        style: Some("cheerful"),
    },
];

pub fn find_preset(name: &str) -> Option<&'static StoryPreset> {
    STORY_PRESETS.iter().find(|preset| preset.name == name)
}

/// Styles supported by `voice`, empty for voices outside the catalogue
pub fn styles_for_voice(voice: &str) -> &'static [&'static str] {
    VOICE_STYLES
        .iter()
        .find(|(name, _)| *name == voice)
        .map(|(_, styles)| *styles)
        .unwrap_or(&[])
}

/// Every style supported by at least one voice, sorted and deduplicated
pub fn all_styles() -> Vec<&'static str> {
    let mut styles: Vec<&'static str> = VOICE_STYLES
        .iter()
        .flat_map(|(_, styles)| styles.iter().copied())
        .collect();
    styles.sort_unstable();
    styles.dedup();
    styles
}

pub fn preset_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = STORY_PRESETS.iter().map(|p| p.name).collect();
    names.sort_unstable();
    names
}
