//! # Ad Copy Extraction
//!
//! Chat models asked for ad copy reply with prose around a JSON object, e.g.
//! `Here is your ad: {"prompt": "...", "text": "..."} Enjoy!`. The reply is
//! untrusted: it may contain no object, a broken one, or one with missing
//! fields. [`AdCopyParser`] turns it into [`AdCopy`] or a `ParseFailure`.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AdlensError, Result};

/// Ad concept produced by a chat model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdCopy {
    /// Image generation prompt.
    pub prompt: String,
    /// Tagline shown with the image.
    pub text: String,
}

/// Parser for ad copy embedded in chat model replies.
#[derive(Debug, Clone)]
pub struct AdCopyParser {
    /// Outermost `{ ... }` span, across newlines.
    re_object: Regex,
}

impl AdCopyParser {
    /// Creates a new parser with compiled patterns.
    ///
    /// # Errors
    /// Returns `AdlensError::RegexError` if the pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_object: Regex::new(r"(?s)\{.*\}")?,
        })
    }

    /// Extract the ad copy object from `raw`.
    pub fn parse(&self, raw: &str) -> Result<AdCopy> {
        let span = self
            .re_object
            .find(raw)
            .ok_or_else(|| parse_failure("reply contains no JSON object"))?;

        let copy: AdCopy = serde_json::from_str(span.as_str())
            .map_err(|e| parse_failure(format!("invalid ad copy JSON: {e}")))?;

        if copy.prompt.trim().is_empty() {
            return Err(parse_failure("ad copy has an empty prompt"));
        }

        Ok(copy)
    }
}

/// Convenience function to extract ad copy with a fresh parser.
pub fn parse_ad_copy(raw: &str) -> Result<AdCopy> {
    AdCopyParser::new()?.parse(raw)
}

fn parse_failure(reason: impl Into<String>) -> AdlensError {
    AdlensError::ParseFailure {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_object() {
        let copy = parse_ad_copy(r#"{"prompt": "a shiny phone", "text": "Call the future"}"#)
            .unwrap();
        assert_eq!(copy.prompt, "a shiny phone");
        assert_eq!(copy.text, "Call the future");
    }

    #[test]
    fn test_parse_object_wrapped_in_prose() {
        let raw = concat!(
            "Sure! Here is your ad:\n```json\n{\n",
            "  \"prompt\": \"runner at dawn\",\n",
            "  \"text\": \"Own the morning\"\n",
            "}\n```\nLet me know!",
        );
        let copy = parse_ad_copy(raw).unwrap();
        assert_eq!(copy.prompt, "runner at dawn");
        assert_eq!(copy.text, "Own the morning");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let copy = parse_ad_copy(r#"{"prompt": "p", "text": "t", "mood": "happy"}"#).unwrap();
        assert_eq!(copy.prompt, "p");
    }

    #[test]
    fn test_no_object() {
        let err = parse_ad_copy("I cannot help with that.").unwrap_err();
        assert!(matches!(err, AdlensError::ParseFailure { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_ad_copy(r#"{"prompt": "unterminated}"#).unwrap_err();
        assert!(matches!(err, AdlensError::ParseFailure { .. }));
    }

    #[test]
    fn test_missing_field() {
        let err = parse_ad_copy(r#"{"prompt": "only a prompt"}"#).unwrap_err();
        assert!(err.to_string().contains("text"));
    }

    #[test]
    fn test_empty_prompt() {
        let err = parse_ad_copy(r#"{"prompt": "  ", "text": "tagline"}"#).unwrap_err();
        assert!(matches!(err, AdlensError::ParseFailure { .. }));
    }

    #[test]
    fn test_parser_is_reusable() {
        let parser = AdCopyParser::new().unwrap();
        for tagline in ["one", "two"] {
            let raw = format!(r#"{{"prompt": "p", "text": "{tagline}"}}"#);
            assert_eq!(parser.parse(&raw).unwrap().text, tagline);
        }
    }

    #[test]
    fn test_two_objects_are_rejected() {
        // The greedy span covers both objects, which is not valid JSON.
        let raw = r#"{"prompt": "a", "text": "b"} or {"prompt": "c", "text": "d"}"#;
        assert!(parse_ad_copy(raw).is_err());
    }
}
