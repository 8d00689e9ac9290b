//! Training loop for the bag-of-embeddings classifier.

use adlens_core::model::argmax;
use adlens_core::{ModelConfig, TextClassifier};
use candle_core::{DType, Device, Tensor};
use candle_nn::{AdamW, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap};

use crate::config::TrainConfig;
use crate::data::EncodedDataset;
use crate::error::TrainError;

/// Loss and accuracy over one pass of the training set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMetrics {
    /// 1-indexed epoch number.
    pub epoch: usize,
    /// Mean cross-entropy over all samples.
    pub loss: f32,
    /// Fraction of samples predicted correctly during the epoch.
    pub accuracy: f32,
}

/// A fitted classifier with its parameters and history.
pub struct TrainedModel {
    pub model: TextClassifier,
    /// Parameter store, saved as the weights artifact.
    pub varmap: VarMap,
    pub config: ModelConfig,
    pub history: Vec<EpochMetrics>,
}

impl TrainedModel {
    /// Metrics of the last epoch.
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.history.last()
    }
}

pub struct Trainer {
    config: TrainConfig,
    device: Device,
}

impl Trainer {
    pub fn new(config: TrainConfig) -> Self {
        Self {
            config,
            device: Device::Cpu,
        }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Fit a classifier on `dataset`.
    ///
    /// Fails with a shape mismatch before any parameter is created if an id
    /// does not fit `vocab_size` or a target does not fit `num_classes`.
    pub fn fit(
        &self,
        dataset: &EncodedDataset,
        vocab_size: usize,
        num_classes: usize,
    ) -> Result<TrainedModel, TrainError> {
        self.config.validate()?;
        if dataset.is_empty() {
            return Err(TrainError::InvalidConfig(
                "cannot train on an empty dataset".into(),
            ));
        }
        dataset.check_shapes(vocab_size, num_classes)?;

        let model_config = ModelConfig {
            vocab_size,
            embedding_dim: self.config.embedding_dim,
            hidden_dim: self.config.hidden_dim,
            num_classes,
            seq_len: dataset.seq_len(),
        };
        model_config.validate()?;

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &self.device);
        let model = TextClassifier::new(model_config, vb)?;

        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            weight_decay: 0.0,
            ..Default::default()
        };
        let mut optimizer = AdamW::new(varmap.all_vars(), params)?;

        tracing::info!(
            "Training on {} samples: vocab={}, classes={}, seq_len={}, epochs={}, batch_size={}",
            dataset.len(),
            vocab_size,
            num_classes,
            dataset.seq_len(),
            self.config.epochs,
            self.config.batch_size
        );

        let mut rng = oorandom::Rand32::new(self.config.seed);
        let mut indices: Vec<usize> = (0..dataset.len()).collect();
        let mut history = Vec::with_capacity(self.config.epochs);

        for epoch in 1..=self.config.epochs {
            shuffle(&mut indices, &mut rng);

            let mut loss_sum = 0.0f32;
            let mut correct = 0usize;

            for batch in indices.chunks(self.config.batch_size) {
                let (ids, targets) = dataset.gather(batch);
                let ids = Tensor::from_vec(ids, (batch.len(), dataset.seq_len()), &self.device)?;
                let targets = Tensor::from_vec(targets, batch.len(), &self.device)?;

                let logits = model.forward(&ids)?;
                let loss = candle_nn::loss::cross_entropy(&logits, &targets)?;
                optimizer.backward_step(&loss)?;

                loss_sum += loss.to_scalar::<f32>()? * batch.len() as f32;
                correct += argmax(&logits)?
                    .eq(&targets)?
                    .to_dtype(DType::F32)?
                    .sum_all()?
                    .to_scalar::<f32>()? as usize;
            }

            let metrics = EpochMetrics {
                epoch,
                loss: loss_sum / dataset.len() as f32,
                accuracy: correct as f32 / dataset.len() as f32,
            };
            tracing::info!(
                "Epoch {}/{} - loss: {:.4} - accuracy: {:.2}%",
                epoch,
                self.config.epochs,
                metrics.loss,
                metrics.accuracy * 100.0
            );
            history.push(metrics);
        }

        Ok(TrainedModel {
            model,
            varmap,
            config: model_config,
            history,
        })
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(TrainConfig::default())
    }
}

/// Fisher-Yates shuffle driven by `rng`.
fn shuffle(indices: &mut [usize], rng: &mut oorandom::Rand32) {
    for i in (1..indices.len()).rev() {
        let j = rng.rand_range(0..(i as u32 + 1)) as usize;
        indices.swap(i, j);
    }
}
