//! # Bag-of-Embeddings Classifier
//!
//! Token embedding lookup, mean pooling over sequence positions, one hidden
//! ReLU layer and a linear output layer with one unit per class.

use candle_core::{D, Result as CandleResult, Tensor};
use candle_nn::{Embedding, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{AdlensError, Result};

/// Architecture of a [`TextClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Embedding rows, padding and OOV ids included.
    pub vocab_size: usize,
    /// Width of each token embedding.
    pub embedding_dim: usize,
    /// Width of the hidden layer.
    pub hidden_dim: usize,
    /// Output units, one per class.
    pub num_classes: usize,
    /// Length of every input sequence.
    pub seq_len: usize,
}

impl ModelConfig {
    /// Rejects configurations with a zero dimension.
    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("vocab_size", self.vocab_size),
            ("embedding_dim", self.embedding_dim),
            ("hidden_dim", self.hidden_dim),
            ("num_classes", self.num_classes),
            ("seq_len", self.seq_len),
        ];
        for (name, value) in dims {
            if value == 0 {
                return Err(AdlensError::InvalidInput(format!("{name} must be > 0")));
            }
        }
        Ok(())
    }
}

/// Text classifier over fixed-length id sequences.
pub struct TextClassifier {
    embedding: Embedding,
    hidden: Linear,
    output: Linear,
    config: ModelConfig,
}

impl TextClassifier {
    /// Create the layers under `vb`.
    ///
    /// With a fresh `VarMap` behind `vb` this initializes new parameters; with
    /// a safetensors-backed builder it loads them and checks every shape.
    pub fn new(config: ModelConfig, vb: VarBuilder) -> CandleResult<Self> {
        let embedding =
            candle_nn::embedding(config.vocab_size, config.embedding_dim, vb.pp("embedding"))?;
        let hidden = candle_nn::linear(config.embedding_dim, config.hidden_dim, vb.pp("hidden"))?;
        let output = candle_nn::linear(config.hidden_dim, config.num_classes, vb.pp("output"))?;

        Ok(Self {
            embedding,
            hidden,
            output,
            config,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

impl Module for TextClassifier {
    /// `ids`: `[batch, seq_len]` u32, returns logits `[batch, num_classes]`.
    fn forward(&self, ids: &Tensor) -> CandleResult<Tensor> {
        let embedded = self.embedding.forward(ids)?;
        let pooled = embedded.mean(1)?;
        let hidden = self.hidden.forward(&pooled)?.relu()?;
        self.output.forward(&hidden)
    }
}

/// Index of the largest value in every row of `logits`.
pub fn argmax(logits: &Tensor) -> CandleResult<Tensor> {
    logits.argmax(D::Minus1)
}
