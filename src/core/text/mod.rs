//! Text preparation ahead of synthesis.

mod markdown;
mod story;

pub use markdown::clean_markdown_for_speech;
pub use story::looks_like_story;
