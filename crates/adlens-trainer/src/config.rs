//! # Pipeline Configuration
//!
//! Every knob of a training run. Values come from defaults, an optional JSON
//! file and command-line overrides, in that order.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TrainError;

/// Hyperparameters of the classifier trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Width of each token embedding.
    pub embedding_dim: usize,
    /// Width of the hidden ReLU layer.
    pub hidden_dim: usize,
    /// Passes over the training set.
    pub epochs: usize,
    /// Samples per optimizer step.
    pub batch_size: usize,
    /// Adam learning rate.
    pub learning_rate: f64,
    /// Seed for the per-epoch shuffle.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 16,
            hidden_dim: 16,
            epochs: 50,
            batch_size: 32,
            learning_rate: 1e-3,
            seed: 42,
        }
    }
}

impl TrainConfig {
    /// Create a new training configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    pub fn with_hidden_dim(mut self, dim: usize) -> Self {
        self.hidden_dim = dim;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Rejects values the trainer cannot run with.
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.embedding_dim == 0 || self.hidden_dim == 0 {
            return Err(TrainError::InvalidConfig(
                "embedding_dim and hidden_dim must be > 0".into(),
            ));
        }
        if self.epochs == 0 {
            return Err(TrainError::InvalidConfig("epochs must be > 0".into()));
        }
        if self.batch_size == 0 {
            return Err(TrainError::InvalidConfig("batch_size must be > 0".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(TrainError::InvalidConfig(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Configuration of a whole training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// CSV corpus with a header row.
    pub input: PathBuf,
    /// Directory receiving the model artifacts.
    pub output_dir: PathBuf,
    /// Header of the free-text column.
    pub text_column: String,
    /// Header of the label column.
    pub label_column: String,
    /// Cap on vocabulary ids, padding and OOV included.
    pub max_vocab_size: usize,
    /// Cap on the encoded sequence length; the longest sample decides when unset.
    pub max_seq_len: Option<usize>,
    pub train: TrainConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/training/ads.csv"),
            output_dir: PathBuf::from("models/classifier"),
            text_column: "text".to_string(),
            label_column: "category".to_string(),
            max_vocab_size: adlens_core::text::DEFAULT_MAX_SIZE,
            max_seq_len: None,
            train: TrainConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a new pipeline configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON configuration file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrainError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrainError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            TrainError::InvalidConfig(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_columns(mut self, text: impl Into<String>, label: impl Into<String>) -> Self {
        self.text_column = text.into();
        self.label_column = label.into();
        self
    }

    pub fn with_max_vocab_size(mut self, size: usize) -> Self {
        self.max_vocab_size = size;
        self
    }

    pub fn with_max_seq_len(mut self, len: usize) -> Self {
        self.max_seq_len = Some(len);
        self
    }

    pub fn with_train(mut self, train: TrainConfig) -> Self {
        self.train = train;
        self
    }

    pub fn validate(&self) -> Result<(), TrainError> {
        if self.text_column == self.label_column {
            return Err(TrainError::InvalidConfig(format!(
                "text and label columns are both {:?}",
                self.text_column
            )));
        }
        if self.max_seq_len == Some(0) {
            return Err(TrainError::InvalidConfig("max_seq_len must be > 0".into()));
        }
        self.train.validate()
    }
}
