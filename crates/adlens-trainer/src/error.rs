use std::path::PathBuf;

use adlens_core::AdlensError;
use thiserror::Error;

/// Errors raised by the training pipeline.
#[derive(Debug, Error)]
pub enum TrainError {
    /// The corpus file does not exist.
    #[error("training data not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The corpus has no header row or no usable sample.
    #[error("training data has no usable rows: {}", path.display())]
    EmptyInput { path: PathBuf },

    /// The header row lacks a configured column.
    #[error("column {column:?} not found in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// A configuration file or value is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Vocabulary, encoding, model or ML runtime failure.
    #[error(transparent)]
    Core(#[from] AdlensError),
}

impl From<candle_core::Error> for TrainError {
    fn from(e: candle_core::Error) -> Self {
        Self::Core(AdlensError::Candle(e))
    }
}
