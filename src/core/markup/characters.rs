//! Multi-voice story markup.
//!
//! Splits a story into narration and quoted dialogue, guesses who is speaking,
//! and gives each character a voice of a matching gender. Attribution verbs such
//! as "whispered" or "shouted" pick an expressive speaking style for the line.
//!
//! Recognised dialogue shapes, in priority order:
//! 1. `Princess Elena called from the tower, "Help!"`
//! 2. `Mary said "Hello"`
//! 3. `The dragon laughed menacingly. "You shall not pass!"`
//! 4. `"Hello," said Mary.` / `"Hello," she whispered.`
//!
//! Everything is heuristic: unmatched quotes are narrated, and speakers that
//! cannot be identified keep the narrator voice.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::escape_xml;

const FEMALE_VOICES: &[&str] = &["en-US-JennyNeural", "en-US-AriaNeural", "en-US-SaraNeural"];
const MALE_VOICES: &[&str] = &["en-US-GuyNeural", "en-US-DavisNeural", "en-US-TonyNeural"];

/// Attributions up to this length are not narrated ("said Mary.")
const MAX_SILENT_ATTRIBUTION: usize = 20;

const NAME: &str = r"(?:Sir|Lord|Lady|King|Queen|Prince|Princess|The|Dr|Mr|Mrs|Ms)\s+[A-Z][a-z]+|[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?";
const LEAD_IN_VERBS: &str = r"(?:said|asked|replied|whispered|shouted|exclaimed|cried|yelled|murmured|muttered|declared|called|laughed|roared|growled|hissed|screamed|bellowed|demanded|answered|responded|snapped|snarled|cooed|sighed|smiled|grinned|frowned|nodded)";
const ATTRIBUTION_VERBS: &str = r"(?:said|asked|replied|whispered|shouted|exclaimed|cried|yelled|murmured|muttered|declared|called|laughed|roared|growled|hissed|screamed|bellowed|demanded|answered|responded|snapped|snarled|cooed|sighed)";
const ACTION_VERBS: &str = r"(?:laughed|smiled|grinned|frowned|nodded|sighed|growled|roared|hissed|snarled|chuckled|giggled|snickered|cackled|bellowed|thundered|boomed)";

static BEFORE_COMMA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r#"({NAME})\s+{LEAD_IN_VERBS}[^"]*,\s*"([^"]+)""#)).unwrap()
});
static BEFORE_DIRECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r#"({NAME})\s+{LEAD_IN_VERBS}\s*"([^"]+)""#)).unwrap());
static ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(The\s+[a-z]+|[A-Z][a-z]+)\s+{ACTION_VERBS}[^".]*\.\s*"([^"]+)""#
    ))
    .unwrap()
});
static SPEAKER_BEFORE_VERB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^({NAME})\s+{ATTRIBUTION_VERBS}")).unwrap());
static SPEAKER_AFTER_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{ATTRIBUTION_VERBS}\s+((?:Sir|Lord|Lady|King|Queen|Prince|Princess|The|Dr|Mr|Mrs|Ms)\s+[A-Z][a-z]+|[Tt]he\s+[a-z]+|[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)"
    ))
    .unwrap()
});
static SHE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bshe\b").unwrap());
static HE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bhe\b").unwrap());
static FEMALE_CONTEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(she|her|mother|mom|mommy|grandmother|grandma|queen|princess|aunt|sister|daughter|wife|girl|woman|lady|miss|mrs|ms)\b").unwrap()
});
static MALE_CONTEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(he|him|his|father|dad|daddy|grandfather|grandpa|king|prince|uncle|brother|son|husband|boy|man|gentleman|mr|sir)\b").unwrap()
});

static EXPRESSIONS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        (
            "whispering",
            r"\b(whispered?|whispering|quietly|softly|in a low voice|hushed)\b",
        ),
        (
            "shouting",
            r"\b(shouted?|shouting|yelled?|yelling|screamed?|screaming|cried out|exclaimed)\b",
        ),
        (
            "excited",
            r"\b(excitedly|exclaimed|enthusiastically|eagerly|joyfully)\b",
        ),
        (
            "sad",
            r"\b(sadly|sorrowfully|tearfully|weeping|sobbed?|sobbing|mournfully)\b",
        ),
        ("angry", r"\b(angrily|furiously|snarled?|growled?|raged?)\b"),
        (
            "terrified",
            r"\b(terrified|frightened|scared|trembling|fearfully|with fear)\b",
        ),
        (
            "cheerful",
            r"\b(cheerfully|happily|brightly|with a smile|laughed?|laughing|giggled?)\b",
        ),
        ("hopeful", r"\b(hopefully|optimistically|with hope)\b"),
    ]
    .into_iter()
    .map(|(style, pattern)| (style, Regex::new(pattern).unwrap()))
    .collect()
});

const FEMALE_NAMES: &[&str] = &[
    "mary", "anna", "emma", "sophia", "olivia", "ava", "isabella", "mia", "charlotte", "amelia",
    "harper", "evelyn", "abigail", "emily", "elizabeth", "sarah", "rachel", "rebecca", "ruth",
    "esther", "miriam", "hannah", "leah", "martha", "maria", "lucy", "alice", "rose", "grace",
    "lily", "ella", "mom", "mommy", "mother", "grandmother", "grandma", "princess", "queen",
    "lady", "elena", "aurora", "belle", "cinderella", "ariel", "elsa", "she", "her", "witch",
    "fairy", "goddess",
];

const MALE_NAMES: &[&str] = &[
    "james", "john", "robert", "michael", "david", "william", "joseph", "thomas", "charles",
    "daniel", "matthew", "anthony", "mark", "paul", "peter", "luke", "adam", "noah", "abraham",
    "moses", "jacob", "isaac", "samuel", "joshua", "dad", "daddy", "father", "grandfather",
    "grandpa", "prince", "king", "sir", "lord", "jesus", "god", "cedric", "arthur", "lancelot",
    "merlin", "he", "him", "dragon", "wizard", "knight", "giant", "troll", "ogre",
];

/// Likely gender of a speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Neutral,
}

/// Voice settings for one character, either assigned or supplied by the client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CharacterOverride {
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

/// One stretch of text spoken with a single voice and style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub voice: String,
    pub style: Option<String>,
    pub is_dialogue: bool,
    pub character: Option<String>,
}

fn known_gender(word: &str) -> Option<Gender> {
    if FEMALE_NAMES.contains(&word) {
        Some(Gender::Female)
    } else if MALE_NAMES.contains(&word) {
        Some(Gender::Male)
    } else {
        None
    }
}

/// Guess a speaker's gender from the name, then from pronouns in `context`.
///
/// Titled names are checked word by word ("Princess Elena", "The dragon").
pub fn detect_gender(name: &str, context: &str) -> Gender {
    let name = name.trim().to_lowercase();
    if let Some(gender) = known_gender(&name) {
        return gender;
    }
    if let Some(gender) = name.split_whitespace().rev().find_map(known_gender) {
        return gender;
    }

    let context = context.to_lowercase();
    let female = FEMALE_CONTEXT_RE.is_match(&context);
    let male = MALE_CONTEXT_RE.is_match(&context);
    match (female, male) {
        (true, false) => Gender::Female,
        (false, true) => Gender::Male,
        _ => Gender::Neutral,
    }
}

/// Speaking style suggested by an attribution ("she whispered" -> whispering)
pub fn detect_expression(text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    EXPRESSIONS
        .iter()
        .find(|(_, re)| re.is_match(&text))
        .map(|(style, _)| *style)
}

/// Round-robin voice for a gender; neutral speakers draw from both pools
pub fn voice_for_gender(gender: Gender, index: usize) -> &'static str {
    match gender {
        Gender::Female => FEMALE_VOICES[index % FEMALE_VOICES.len()],
        Gender::Male => MALE_VOICES[index % MALE_VOICES.len()],
        Gender::Neutral => {
            let all = MALE_VOICES.len() + FEMALE_VOICES.len();
            let i = index % all;
            if i < MALE_VOICES.len() {
                MALE_VOICES[i]
            } else {
                FEMALE_VOICES[i - MALE_VOICES.len()]
            }
        }
    }
}

/// Pull the speaker out of an attribution that follows a quote
fn speaker_from_attribution(attribution: &str) -> Option<String> {
    if let Some(caps) = SPEAKER_BEFORE_VERB_RE.captures(attribution) {
        return Some(caps[1].trim().to_string());
    }
    if let Some(caps) = SPEAKER_AFTER_VERB_RE.captures(attribution) {
        return Some(caps[1].trim().to_string());
    }

    let lower = attribution.to_lowercase();
    if SHE_RE.is_match(&lower) {
        Some("she".to_string())
    } else if HE_RE.is_match(&lower) {
        Some("he".to_string())
    } else {
        None
    }
}

#[derive(Debug)]
struct DialogueMatch {
    start: usize,
    end: usize,
    dialogue: String,
    /// Narration around the quote that identified the speaker
    attribution: String,
    attribution_first: bool,
    character: Option<String>,
    expression: Option<&'static str>,
}

impl DialogueMatch {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        (self.start <= start && start < self.end) || (start <= self.start && self.start < end)
    }
}

/// Where a trailing attribution stops: before the next quote, at a paragraph
/// break, before a new capitalised line, or at the end of the text
fn attribution_ends_at(text: &str, pos: usize) -> bool {
    let rest = &text[pos..];
    rest.is_empty()
        || rest == "\n"
        || rest.starts_with('"')
        || rest.starts_with("\n\n")
        || (rest.starts_with('\n') && rest[1..].starts_with(|c: char| c.is_ascii_uppercase()))
}

/// Quotes followed by an optional attribution: `"Hello," said Mary.`
fn find_trailing_attributions(text: &str) -> Vec<DialogueMatch> {
    let mut matches = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('"') {
        let open = pos + offset;
        let Some(close_offset) = text[open + 1..].find('"') else {
            break;
        };
        let close = open + 1 + close_offset;
        if close == open + 1 {
            // empty quotes: retry from the second quote
            pos = open + 1;
            continue;
        }

        let mut attr_start = close + 1;
        while let Some(c) = text[attr_start..].chars().next() {
            if c.is_whitespace() || c == ',' {
                attr_start += c.len_utf8();
            } else {
                break;
            }
        }

        let mut attr_end = attr_start;
        while !attribution_ends_at(text, attr_end) {
            let Some(c) = text[attr_end..].chars().next() else {
                break;
            };
            attr_end += c.len_utf8();
        }

        let attribution = text[attr_start..attr_end].trim().to_string();
        matches.push(DialogueMatch {
            start: open,
            end: attr_end,
            dialogue: text[open + 1..close].to_string(),
            character: speaker_from_attribution(&attribution),
            expression: detect_expression(&attribution),
            attribution,
            attribution_first: false,
        });
        pos = attr_end.max(close + 1);
    }

    matches
}

/// Assigns voices to segments of a story
pub struct CharacterVoiceParser {
    narrator_voice: String,
    narrator_style: Option<String>,
    overrides: HashMap<String, CharacterOverride>,
    assigned: HashMap<String, CharacterOverride>,
    next_voice: usize,
}

impl CharacterVoiceParser {
    pub fn new(
        narrator_voice: impl Into<String>,
        narrator_style: Option<String>,
        overrides: &HashMap<String, CharacterOverride>,
    ) -> Self {
        Self {
            narrator_voice: narrator_voice.into(),
            narrator_style,
            overrides: overrides
                .iter()
                .map(|(name, o)| (name.trim().to_lowercase(), o.clone()))
                .collect(),
            assigned: HashMap::new(),
            next_voice: 0,
        }
    }

    /// Voice settings for `character`, assigning one on first sight
    fn character_voice(&mut self, character: &str, context: &str) -> (String, Option<String>) {
        let key = character.trim().to_lowercase();

        if let Some(o) = self.overrides.get(&key) {
            let voice = o
                .voice
                .clone()
                .unwrap_or_else(|| self.narrator_voice.clone());
            return (voice, o.style.clone());
        }
        if let Some(assigned) = self.assigned.get(&key) {
            return (assigned.voice.clone().unwrap_or_default(), None);
        }

        let gender = detect_gender(character, context);
        let voice = voice_for_gender(gender, self.next_voice).to_string();
        self.next_voice += 1;
        tracing::debug!(character = %character, ?gender, voice = %voice, "Assigned character voice");

        self.assigned.insert(
            key,
            CharacterOverride {
                voice: Some(voice.clone()),
                style: None,
                gender: Some(gender),
            },
        );
        (voice, None)
    }

    fn narration(&self, text: &str) -> Segment {
        Segment {
            text: text.to_string(),
            voice: self.narrator_voice.clone(),
            style: self.narrator_style.clone(),
            is_dialogue: false,
            character: None,
        }
    }

    fn find_dialogue(text: &str) -> Vec<DialogueMatch> {
        let mut matches: Vec<DialogueMatch> = Vec::new();

        for re in [&*BEFORE_COMMA_RE, &*BEFORE_DIRECT_RE, &*ACTION_RE] {
            for caps in re.captures_iter(text) {
                let (Some(whole), Some(name), Some(dialogue)) = (caps.get(0), caps.get(1), caps.get(2))
                else {
                    continue;
                };
                if matches.iter().any(|m| m.overlaps(whole.start(), whole.end())) {
                    continue;
                }
                // lead-in text up to the opening quote
                let lead_in = text[whole.start()..dialogue.start() - 1].trim();
                matches.push(DialogueMatch {
                    start: whole.start(),
                    end: whole.end(),
                    dialogue: dialogue.as_str().to_string(),
                    attribution: lead_in.to_string(),
                    attribution_first: true,
                    character: Some(name.as_str().to_string()),
                    expression: detect_expression(lead_in),
                });
            }
        }

        for candidate in find_trailing_attributions(text) {
            if !matches
                .iter()
                .any(|m| m.overlaps(candidate.start, candidate.end))
            {
                matches.push(candidate);
            }
        }

        matches.sort_by_key(|m| m.start);
        matches
    }

    /// Split `text` into narrator and character segments
    pub fn parse(&mut self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut last_end = 0;

        for m in Self::find_dialogue(text) {
            if m.start > last_end {
                let narration = text[last_end..m.start].trim();
                if !narration.is_empty() {
                    segments.push(self.narration(narration));
                }
            }

            let spoken_attribution = m.attribution.chars().count() > MAX_SILENT_ATTRIBUTION;
            if m.attribution_first && spoken_attribution {
                segments.push(self.narration(&m.attribution));
            }

            let (voice, style) = match &m.character {
                Some(character) => {
                    let (voice, default_style) = self.character_voice(character, &m.attribution);
                    (voice, m.expression.map(str::to_string).or(default_style))
                }
                None => (self.narrator_voice.clone(), None),
            };
            segments.push(Segment {
                text: m.dialogue.clone(),
                voice,
                style,
                is_dialogue: true,
                character: m.character.clone(),
            });

            if !m.attribution_first && spoken_attribution {
                segments.push(self.narration(&m.attribution));
            }

            last_end = m.end;
        }

        let remaining = text[last_end..].trim();
        if !remaining.is_empty() {
            segments.push(self.narration(remaining));
        }

        if segments.is_empty() {
            segments.push(self.narration(text));
        }

        segments
    }
}

/// Render segments as SSML, opening a new voice element only when the voice changes
pub fn render_segments(segments: &[Segment]) -> String {
    let mut parts = vec![
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xmlns:mstts='https://www.w3.org/2001/mstts' xml:lang='en-US'>"
            .to_string(),
    ];
    let mut current_voice: Option<&str> = None;

    for segment in segments {
        if current_voice != Some(segment.voice.as_str()) {
            if current_voice.is_some() {
                parts.push("</voice>".to_string());
            }
            parts.push(format!("<voice name='{}'>", escape_xml(&segment.voice)));
            current_voice = Some(segment.voice.as_str());
        }

        let text = escape_xml(&segment.text);
        match &segment.style {
            Some(style) => {
                parts.push(format!("<mstts:express-as style='{}'>", escape_xml(style)));
                parts.push(text);
                parts.push("</mstts:express-as>".to_string());
            }
            None => parts.push(text),
        }
    }

    if current_voice.is_some() {
        parts.push("</voice>".to_string());
    }
    parts.push("</speak>".to_string());

    parts.join("\n")
}

/// Build multi-voice SSML for a story
pub fn build_character_ssml(
    text: &str,
    narrator_voice: &str,
    narrator_style: Option<&str>,
    overrides: &HashMap<String, CharacterOverride>,
) -> String {
    let mut parser =
        CharacterVoiceParser::new(narrator_voice, narrator_style.map(str::to_string), overrides);
    render_segments(&parser.parse(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NARRATOR: &str = "en-US-GuyNeural";

    fn parse(text: &str) -> Vec<Segment> {
        CharacterVoiceParser::new(NARRATOR, Some("friendly".to_string()), &HashMap::new())
            .parse(text)
    }

    #[test]
    fn test_detect_gender() {
        assert_eq!(detect_gender("Mary", ""), Gender::Female);
        assert_eq!(detect_gender("Sir Cedric", ""), Gender::Male);
        assert_eq!(detect_gender("Princess Elena", ""), Gender::Female);
        assert_eq!(detect_gender("The dragon", ""), Gender::Male);
        assert_eq!(detect_gender("Zorblax", "and then she left"), Gender::Female);
        assert_eq!(detect_gender("Zorblax", "his ship was ready"), Gender::Male);
        assert_eq!(detect_gender("Zorblax", "the robot"), Gender::Neutral);
    }

    #[test]
    fn test_detect_expression() {
        assert_eq!(detect_expression("she whispered"), Some("whispering"));
        assert_eq!(detect_expression("he YELLED"), Some("shouting"));
        assert_eq!(detect_expression("said the owl sadly"), Some("sad"));
        assert_eq!(detect_expression("said Tom"), None);
    }

    #[test]
    fn test_voice_round_robin() {
        assert_eq!(voice_for_gender(Gender::Female, 0), "en-US-JennyNeural");
        assert_eq!(voice_for_gender(Gender::Female, 4), "en-US-AriaNeural");
        assert_eq!(voice_for_gender(Gender::Male, 2), "en-US-TonyNeural");
        assert_eq!(voice_for_gender(Gender::Neutral, 3), "en-US-JennyNeural");
    }

    #[test]
    fn test_plain_narration() {
        let segments = parse("The night was quiet.");
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_dialogue);
        assert_eq!(segments[0].voice, NARRATOR);
        assert_eq!(segments[0].style.as_deref(), Some("friendly"));
    }

    #[test]
    fn test_trailing_attribution() {
        let segments = parse(r#"The owl looked up. "Who goes there?" whispered Mary."#);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "The owl looked up.");
        let line = &segments[1];
        assert!(line.is_dialogue);
        assert_eq!(line.text, "Who goes there?");
        assert_eq!(line.character.as_deref(), Some("Mary"));
        assert_eq!(line.voice, "en-US-JennyNeural");
        assert_eq!(line.style.as_deref(), Some("whispering"));
    }

    #[test]
    fn test_pronoun_speaker() {
        let segments = parse(r#""I am not afraid," he shouted."#);
        assert_eq!(segments[0].character.as_deref(), Some("he"));
        assert_eq!(segments[0].voice, "en-US-GuyNeural");
        assert_eq!(segments[0].style.as_deref(), Some("shouting"));
    }

    #[test]
    fn test_adverb_is_not_a_speaker() {
        let segments = parse(r#""Hush," she said softly."#);
        assert_eq!(segments[0].character.as_deref(), Some("she"));
        assert_eq!(segments[0].style.as_deref(), Some("whispering"));
    }

    #[test]
    fn test_lead_in_with_comma() {
        let segments = parse(r#"Princess Elena called from the tower, "Help me!""#);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Princess Elena called from the tower,");
        assert!(!segments[0].is_dialogue);
        assert_eq!(segments[1].text, "Help me!");
        assert_eq!(segments[1].character.as_deref(), Some("Princess Elena"));
        assert_eq!(segments[1].voice, "en-US-JennyNeural");
    }

    #[test]
    fn test_action_then_dialogue() {
        let segments = parse(r#"The dragon laughed menacingly. "You shall not pass!""#);
        assert_eq!(segments[0].text, "The dragon laughed menacingly.");
        assert_eq!(segments[1].character.as_deref(), Some("The dragon"));
        assert_eq!(segments[1].voice, "en-US-GuyNeural");
        assert_eq!(segments[1].style.as_deref(), Some("cheerful"));
    }

    #[test]
    fn test_same_character_keeps_voice() {
        let text = r#""Hello," said Tom. "Hi," said Anna. "Bye," said Tom."#;
        let segments = parse(text);
        let tom: Vec<&Segment> = segments
            .iter()
            .filter(|s| s.character.as_deref() == Some("Tom"))
            .collect();
        assert_eq!(tom.len(), 2);
        assert_eq!(tom[0].voice, tom[1].voice);
        let anna = segments
            .iter()
            .find(|s| s.character.as_deref() == Some("Anna"))
            .unwrap();
        assert_eq!(anna.voice, "en-US-AriaNeural");
    }

    #[test]
    fn test_overrides_win() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "Mary".to_string(),
            CharacterOverride {
                voice: Some("en-US-AnaNeural".to_string()),
                style: Some("cheerful".to_string()),
                gender: None,
            },
        );
        let mut parser = CharacterVoiceParser::new(NARRATOR, None, &overrides);
        let segments = parser.parse(r#""Look!" said Mary."#);
        assert_eq!(segments[0].voice, "en-US-AnaNeural");
        assert_eq!(segments[0].style.as_deref(), Some("cheerful"));
    }

    #[test]
    fn test_render_merges_same_voice() {
        let segments = vec![
            Segment {
                text: "One.".into(),
                voice: NARRATOR.into(),
                style: None,
                is_dialogue: false,
                character: None,
            },
            Segment {
                text: "Two & three.".into(),
                voice: NARRATOR.into(),
                style: Some("sad".into()),
                is_dialogue: false,
                character: None,
            },
            Segment {
                text: "Hi".into(),
                voice: "en-US-JennyNeural".into(),
                style: None,
                is_dialogue: true,
                character: Some("Mary".into()),
            },
        ];
        let ssml = render_segments(&segments);
        assert_eq!(ssml.matches("<voice ").count(), 2);
        assert_eq!(ssml.matches("</voice>").count(), 2);
        assert!(ssml.contains("<mstts:express-as style='sad'>\nTwo &amp; three.\n</mstts:express-as>"));
        assert!(ssml.starts_with("<speak "));
        assert!(ssml.ends_with("</speak>"));
    }

    #[test]
    fn test_build_character_ssml_escapes_text() {
        let ssml = build_character_ssml(
            r#"Tom & Jerry ran. "Wait <here>!" said Tom."#,
            NARRATOR,
            Some("friendly"),
            &HashMap::new(),
        );
        assert!(ssml.contains("Tom &amp; Jerry ran."));
        assert!(ssml.contains("Wait &lt;here&gt;!"));
    }
}
