//! SSML payloads for the speech backend.
//!
//! A job is either a single voice reading the whole text ([`MarkupShape::Flat`])
//! or a narrator plus per-character voices ([`MarkupShape::MultiVoice`]).

mod characters;

use std::collections::HashMap;

pub use characters::{
    CharacterOverride, CharacterVoiceParser, Gender, Segment, build_character_ssml,
    detect_expression, detect_gender, render_segments, voice_for_gender,
};

/// Escapes XML special characters for safe embedding in SSML.
///
/// # Example
///
/// ```rust
/// use tonisynth::core::markup::escape_xml;
///
/// assert_eq!(escape_xml("Tom & Jerry"), "Tom &amp; Jerry");
/// assert_eq!(escape_xml("<b>'hi'</b>"), "&lt;b&gt;&apos;hi&apos;&lt;/b&gt;");
/// ```
pub fn escape_xml(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}

/// Single-voice SSML document.
///
/// The `mstts` namespace and `express-as` element are only emitted when a
/// style is given.
///
/// ```rust
/// use tonisynth::core::markup::build_simple_ssml;
///
/// let ssml = build_simple_ssml("Hello", "en-US-JennyNeural", Some("cheerful"));
/// assert!(ssml.contains("<mstts:express-as style='cheerful'>"));
///
/// let plain = build_simple_ssml("Hello", "en-US-JennyNeural", None);
/// assert!(!plain.contains("mstts"));
/// ```
pub fn build_simple_ssml(text: &str, voice: &str, style: Option<&str>) -> String {
    let text = escape_xml(text);
    let voice = escape_xml(voice);

    match style.filter(|s| !s.is_empty()) {
        Some(style) => {
            let style = escape_xml(style);
            format!(
                r#"<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xmlns:mstts='https://www.w3.org/2001/mstts' xml:lang='en-US'>
    <voice name='{voice}'>
        <mstts:express-as style='{style}'>
            {text}
        </mstts:express-as>
    </voice>
</speak>"#
            )
        }
        None => format!(
            r#"<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='en-US'>
    <voice xml:lang='en-US' name='{voice}'>
        {text}
    </voice>
</speak>"#
        ),
    }
}

/// Payload layout for one job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupShape {
    Flat,
    MultiVoice,
}

impl MarkupShape {
    pub fn from_character_flag(character_voices: bool) -> Self {
        if character_voices {
            Self::MultiVoice
        } else {
            Self::Flat
        }
    }
}

/// What to say and who says it
#[derive(Debug, Clone, Default)]
pub struct MarkupRequest<'a> {
    pub text: &'a str,
    pub voice: &'a str,
    pub style: Option<&'a str>,
    pub narrator_voice: &'a str,
    pub narrator_style: Option<&'a str>,
    pub overrides: Option<&'a HashMap<String, CharacterOverride>>,
}

/// Build the SSML for `request` in the given shape
pub fn build_markup(shape: MarkupShape, request: &MarkupRequest<'_>) -> String {
    match shape {
        MarkupShape::Flat => build_simple_ssml(request.text, request.voice, request.style),
        MarkupShape::MultiVoice => {
            let empty = HashMap::new();
            build_character_ssml(
                request.text,
                request.narrator_voice,
                request.narrator_style,
                request.overrides.unwrap_or(&empty),
            )
        }
    }
}
