//! Input normalization ahead of the cleaning stages

use lazy_static::lazy_static;
use regex::Regex;

/// Punctuation removed by [`TextNormalizer::strip_punctuation`]
const STRIPPED_PUNCTUATION: &[char] = &['，', '、', '；', '：', '。', '？', ',', '.', '?', '"', '\''];

/// Sentence boundaries for [`TextNormalizer::split_sentences`]
const SENTENCE_DELIMITERS: &[char] = &['.', '。', '…', ',', '，'];

lazy_static! {
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Replace listed punctuation with spaces
    pub fn strip_punctuation(&self, text: &str) -> String {
        text.chars()
            .map(|c| if STRIPPED_PUNCTUATION.contains(&c) { ' ' } else { c })
            .collect()
    }

    pub fn normalize_whitespace(&self, text: &str) -> String {
        WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
    }

    /// Split on sentence delimiters, dropping the delimiters and empty pieces
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.split(SENTENCE_DELIMITERS)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}
