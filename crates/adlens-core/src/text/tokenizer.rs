//! # Word Tokenizer
//!
//! Splits free text into lower-cased word tokens. The same splitting runs when
//! the vocabulary is built, when the training set is encoded and when the
//! inference side encodes page text, so any change here invalidates every
//! persisted vocabulary.

/// Characters treated as separators in addition to whitespace.
const FILTERS: &[char] = &[
    '!', '"', '#', '$', '%', '&', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<', '=',
    '>', '?', '@', '[', '\\', ']', '^', '_', '`', '{', '|', '}', '~',
];

/// Tokenizer for classifier input text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Split `text` into tokens.
    ///
    /// Text is lower-cased, every filter character becomes a separator and the
    /// result is split on whitespace. Empty pieces are dropped.
    ///
    /// # Examples
    /// ```
    /// use adlens_core::text::Tokenizer;
    ///
    /// let tokens = Tokenizer::new().tokenize("Great phone, GREAT price!");
    /// assert_eq!(tokens, vec!["great", "phone", "great", "price"]);
    /// ```
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if FILTERS.contains(&c) { ' ' } else { c })
            .collect();

        normalized.split_whitespace().map(str::to_string).collect()
    }

    /// Number of tokens `text` splits into.
    pub fn count(&self, text: &str) -> usize {
        self.tokenize(text).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = Tokenizer::new().tokenize("Win the game");
        assert_eq!(tokens, vec!["win", "the", "game"]);
    }

    #[test]
    fn test_tokenize_punctuation() {
        let tokens = Tokenizer::new().tokenize("stocks-and-bonds: (2024) outlook.");
        assert_eq!(tokens, vec!["stocks", "and", "bonds", "2024", "outlook"]);
    }

    #[test]
    fn test_tokenize_keeps_apostrophes() {
        let tokens = Tokenizer::new().tokenize("Don't miss it");
        assert_eq!(tokens, vec!["don't", "miss", "it"]);
    }

    #[test]
    fn test_tokenize_tabs_and_newlines() {
        let tokens = Tokenizer::new().tokenize("new\tlaptop\r\nsale");
        assert_eq!(tokens, vec!["new", "laptop", "sale"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(Tokenizer::new().tokenize("").is_empty());
        assert!(Tokenizer::new().tokenize("  ...!!  ").is_empty());
    }

    #[test]
    fn test_count() {
        assert_eq!(Tokenizer::new().count("one, two; three"), 3);
    }
}
