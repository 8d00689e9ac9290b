//! # Interest Classifier
//!
//! Loads a trained model directory and predicts the interest category of a
//! piece of text. Encoding goes through the persisted vocabulary and the same
//! [`SequenceEncoder`] used at training time.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{Module, VarBuilder};
use serde::Serialize;

use crate::artifact::ModelManifest;
use crate::error::{AdlensError, Result};
use crate::labels::LabelIndex;
use crate::model::TextClassifier;
use crate::text::{SequenceEncoder, Vocabulary};

/// A single prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted label.
    pub label: String,
    /// Class id of `label`.
    pub class_id: u32,
    /// Softmax probability of the predicted class in `[0.0, 1.0]`.
    pub confidence: f32,
}

/// Inference-side classifier backed by persisted artifacts.
pub struct Classifier {
    model: TextClassifier,
    vocab: Vocabulary,
    labels: LabelIndex,
    encoder: SequenceEncoder,
    device: Device,
}

impl Classifier {
    /// Load the model in `dir` on the CPU.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let device = Device::Cpu;

        let manifest = ModelManifest::load(dir)?;
        let architecture = manifest.architecture;
        architecture.validate()?;
        let vocab = Vocabulary::load(manifest.vocabulary_path(dir))?;

        if vocab.size() > architecture.vocab_size {
            return Err(AdlensError::ShapeMismatch(format!(
                "vocabulary has {} ids but the embedding table has {} rows",
                vocab.size(),
                architecture.vocab_size
            )));
        }

        let weights_path = manifest.weights_path(dir);
        if !weights_path.exists() {
            return Err(AdlensError::ArtifactNotFound {
                path: weights_path.display().to_string(),
            });
        }
        let vb = VarBuilder::from_buffered_safetensors(
            std::fs::read(&weights_path)?,
            DType::F32,
            &device,
        )?;
        let model = TextClassifier::new(architecture, vb)?;

        tracing::info!(
            "Loaded classifier from {} ({} tokens, {} classes, seq_len {})",
            dir.display(),
            vocab.len(),
            manifest.labels.len(),
            architecture.seq_len
        );

        Ok(Self {
            model,
            vocab,
            labels: manifest.labels,
            encoder: SequenceEncoder::new(architecture.seq_len),
            device,
        })
    }

    /// Ids the model sees for `text`.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        self.encoder.encode(&self.vocab, text)
    }

    /// Predict the label of `text`.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        if text.trim().is_empty() {
            return Err(AdlensError::EmptyText);
        }

        let ids = self.encode(text);
        let input = Tensor::from_vec(ids, (1, self.encoder.seq_len()), &self.device)?;
        let logits = self.model.forward(&input)?;
        let probabilities: Vec<f32> = candle_nn::ops::softmax(&logits, 1)?
            .squeeze(0)?
            .to_vec1()?;

        let (class_id, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| AdlensError::ShapeMismatch("model produced no outputs".into()))?;

        let class_id = class_id as u32;
        let label = self
            .labels
            .label(class_id)
            .ok_or_else(|| {
                AdlensError::ShapeMismatch(format!("class {class_id} has no label"))
            })?
            .to_string();

        Ok(Prediction {
            label,
            class_id,
            confidence,
        })
    }

    /// Predict the label of `text`, or return `fallback` when prediction fails.
    pub fn predict_or(&self, text: &str, fallback: &str) -> String {
        match self.predict(text) {
            Ok(prediction) => prediction.label,
            Err(e) => {
                tracing::warn!("Prediction failed, using fallback {:?}: {}", fallback, e);
                fallback.to_string()
            }
        }
    }

    pub fn labels(&self) -> &LabelIndex {
        &self.labels
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{MANIFEST_FILE, VOCABULARY_FILE, WEIGHTS_FILE};
    use crate::model::ModelConfig;
    use candle_nn::VarMap;

    /// Writes an untrained model directory and returns it.
    fn write_model(dir: &Path) -> ModelConfig {
        let texts = ["great phone", "win the game"];
        let vocab = Vocabulary::build(&texts, 100).unwrap();
        let (labels, _) = LabelIndex::fit(&["technology", "sports"]);
        let config = ModelConfig {
            vocab_size: vocab.size(),
            embedding_dim: 4,
            hidden_dim: 4,
            num_classes: labels.len(),
            seq_len: 3,
        };

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        TextClassifier::new(config, vb).unwrap();
        varmap.save(dir.join(WEIGHTS_FILE)).unwrap();

        vocab.save(dir.join(VOCABULARY_FILE)).unwrap();
        let manifest = ModelManifest::new(config, labels);
        std::fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
        config
    }

    #[test]
    fn test_load_and_predict() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path());

        let classifier = Classifier::load(dir.path()).unwrap();
        assert_eq!(classifier.encode("great phone"), vec![2, 3, 0]);

        let prediction = classifier.predict("great phone").unwrap();
        assert!(["sports", "technology"].contains(&prediction.label.as_str()));
        assert!(prediction.confidence >= 0.5 && prediction.confidence <= 1.0);
    }

    #[test]
    fn test_predict_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path());

        let classifier = Classifier::load(dir.path()).unwrap();
        assert!(matches!(
            classifier.predict("   "),
            Err(AdlensError::EmptyText)
        ));
        assert_eq!(classifier.predict_or("", "general"), "general");
    }

    #[test]
    fn test_load_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Classifier::load(dir.path().join("nope")),
            Err(AdlensError::ArtifactNotFound { .. })
        ));
    }

    #[test]
    fn test_load_missing_weights() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path());
        std::fs::remove_file(dir.path().join(WEIGHTS_FILE)).unwrap();

        assert!(matches!(
            Classifier::load(dir.path()),
            Err(AdlensError::ArtifactNotFound { .. })
        ));
    }

    #[test]
    fn test_load_rejects_zero_width_architecture() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path());

        let path = dir.path().join(MANIFEST_FILE);
        let mut manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        manifest["architecture"]["hidden_dim"] = serde_json::json!(0);
        std::fs::write(&path, manifest.to_string()).unwrap();

        assert!(matches!(
            Classifier::load(dir.path()),
            Err(AdlensError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_load_rejects_oversized_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path());

        let bigger = Vocabulary::build(&["a b c d e f g h i j k l"], 100).unwrap();
        bigger.save(dir.path().join(VOCABULARY_FILE)).unwrap();

        assert!(matches!(
            Classifier::load(dir.path()),
            Err(AdlensError::ShapeMismatch(_))
        ));
    }
}
