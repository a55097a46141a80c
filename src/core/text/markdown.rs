use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```\w*\n.*?```").unwrap());
static HORIZONTAL_RULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[-*_]{3,}[ \t]*$").unwrap());
static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+(.+)$").unwrap());
static BLOCKQUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^>\s*(.*)$").unwrap());
static CHECKBOX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[*+-]\s+\[[xX\s]\]\s+(.+)$").unwrap());
static UNORDERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[*+-]\s+(.+)$").unwrap());
static ORDERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s+(.+)$").unwrap());
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]+\)").unwrap());
static INLINE_LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static REFERENCE_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\[[^\]]*\]").unwrap());
static REFERENCE_DEF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\[[^\]]+\]:\s*.+$").unwrap());
static BOLD_STAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static BOLD_UNDERSCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.+?)__").unwrap());
static STRIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").unwrap());
static CODE_SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Strip markdown so the text reads naturally when spoken.
///
/// Code blocks, tables and horizontal rules are dropped. Headers, quotes, list
/// items, links and emphasis keep their text. Whitespace is normalised last:
/// trailing spaces go, runs of spaces become one, and at most two blank lines
/// survive in a row.
pub fn clean_markdown_for_speech(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = FENCED_CODE_RE.replace_all(text, "");
    let text = remove_tables(&text);
    let text = HORIZONTAL_RULE_RE.replace_all(&text, "");
    let text = map_lines(&text, |line| {
        HEADER_RE
            .captures(line)
            .map(|caps| caps[1].trim().to_string())
    });
    let text = map_lines(&text, |line| {
        BLOCKQUOTE_RE.captures(line).map(|caps| caps[1].to_string())
    });
    let text = map_lines(&text, unwrap_list_item);
    let text = remove_links(&text);
    let text = remove_emphasis(&text);

    clean_whitespace(&text)
}

/// Apply `f` to every line, keeping lines it returns `None` for
fn map_lines(text: &str, f: impl Fn(&str) -> Option<String>) -> String {
    text.split('\n')
        .map(|line| f(line).unwrap_or_else(|| line.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn remove_tables(text: &str) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .filter(|line| {
            let stripped = line.trim();
            !(stripped.len() >= 2 && stripped.starts_with('|') && stripped.ends_with('|'))
        })
        .collect();
    collapse_blank_lines(&lines)
}

fn unwrap_list_item(line: &str) -> Option<String> {
    let stripped = line.trim_start();
    [&*CHECKBOX_RE, &*UNORDERED_RE, &*ORDERED_RE]
        .iter()
        .find_map(|re| re.captures(stripped))
        .map(|caps| caps[1].trim().to_string())
}

fn remove_links(text: &str) -> String {
    let text = IMAGE_RE.replace_all(text, "$1");
    let text = INLINE_LINK_RE.replace_all(&text, "$1");
    let text = REFERENCE_LINK_RE.replace_all(&text, "$1");
    REFERENCE_DEF_RE.replace_all(&text, "").into_owned()
}

fn remove_emphasis(text: &str) -> String {
    let text = BOLD_STAR_RE.replace_all(text, "$1");
    let text = BOLD_UNDERSCORE_RE.replace_all(&text, "$1");
    let text = strip_single_delimiter(&text, '*');
    let text = strip_single_delimiter(&text, '_');
    let text = STRIKE_RE.replace_all(&text, "$1");
    CODE_SPAN_RE.replace_all(&text, "$1").into_owned()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Remove `*italic*` / `_italic_` markers that stand alone, leaving delimiters
/// inside words (`snake_case`, `2*3*4`) untouched.
fn strip_single_delimiter(text: &str, delimiter: char) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let opens = c == delimiter && (i == 0 || !is_word_char(chars[i - 1]));
        if opens
            && let Some(offset) = chars[i + 1..].iter().position(|&ch| ch == delimiter)
        {
            let close = i + 1 + offset;
            let closes = close > i + 1 && chars.get(close + 1).is_none_or(|&ch| !is_word_char(ch));
            if closes {
                out.extend(&chars[i + 1..close]);
                i = close + 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }

    out
}

fn collapse_blank_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut result = Vec::with_capacity(lines.len());
    let mut blank_run = 0;

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run <= 2 {
                result.push(line);
            }
        } else {
            blank_run = 0;
            result.push(line);
        }
    }

    result.join("\n")
}

fn clean_whitespace(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').map(str::trim_end).collect();
    let text = collapse_blank_lines(&lines);
    SPACE_RUN_RE.replace_all(&text, " ").trim().to_string()
}
