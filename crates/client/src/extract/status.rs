//! Whether extracted text is worth summarizing.

use serde::{Deserialize, Serialize};

pub const MIN_WORDS: usize = 50;
pub const MIN_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatus {
    /// At least [`MIN_WORDS`] words.
    pub has_content: bool,
    pub word_count: usize,
    /// Length in characters.
    pub content_length: usize,
    /// Enough words and at least [`MIN_CHARS`] characters.
    pub is_valid: bool,
}

pub fn content_status(text: &str) -> ContentStatus {
    let word_count = text.split_whitespace().count();
    let content_length = text.chars().count();

    ContentStatus {
        has_content: word_count >= MIN_WORDS,
        word_count,
        content_length,
        is_valid: word_count >= MIN_WORDS && content_length >= MIN_CHARS,
    }
}
