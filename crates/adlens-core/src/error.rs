use thiserror::Error;

/// Errors that can occur during adlens core operations.
#[derive(Debug, Error)]
pub enum AdlensError {
    /// The input cannot produce a usable vocabulary, model or configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Encoded ids, labels or persisted artifacts disagree on a dimension.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The text to classify is empty or contains only whitespace.
    #[error("text is empty or whitespace-only")]
    EmptyText,

    /// A required artifact file is missing.
    #[error("artifact not found: {path}")]
    ArtifactNotFound {
        /// The path that was expected to exist.
        path: String,
    },

    /// Untrusted model output could not be turned into a typed value.
    #[error("failed to parse model output: {reason}")]
    ParseFailure {
        /// Why the output was rejected.
        reason: String,
    },

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// Reading or writing an artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An artifact contained invalid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Candle ML framework error.
    #[error("ML runtime error: {0}")]
    Candle(#[from] candle_core::Error),
}

/// Result type alias for adlens operations.
pub type Result<T> = std::result::Result<T, AdlensError>;
