use once_cell::sync::Lazy;
use regex::Regex;

const STORY_KEYWORDS: &[&str] = &["story", "adventure", "tale", "once", "upon"];

static STORY_OPENING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(once upon a time|in a land far|long ago|the story of|a tale of|chapter \d|prologue)")
        .unwrap()
});

/// Whether the text reads like a narrative.
///
/// True when one of the first ten words is a story keyword ("once", "tale", ...)
/// or the text starts with a classic opening such as "Long ago" or "Chapter 1".
/// Used to switch on character voices when the request leaves it unspecified.
pub fn looks_like_story(text: &str) -> bool {
    let lower = text.to_lowercase();

    let keyword_hit = lower.split_whitespace().take(10).any(|word| {
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        STORY_KEYWORDS.contains(&cleaned.as_str())
    });
    if keyword_hit {
        return true;
    }

    let head: String = lower.chars().take(100).collect();
    STORY_OPENING_RE.is_match(&head)
}
