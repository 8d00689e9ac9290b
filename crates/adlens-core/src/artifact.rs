//! # Artifact Layout
//!
//! A trained model directory holds three files:
//! - `model.json`: the [`ModelManifest`], written last
//! - `model.safetensors`: the trained parameters
//! - `tokenizer.json`: the vocabulary as a token to id object
//!
//! Readers load the manifest first; its presence means the other two files
//! belong to the same training run.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AdlensError, Result};
use crate::labels::LabelIndex;
use crate::model::ModelConfig;

pub const MANIFEST_FILE: &str = "model.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";
pub const VOCABULARY_FILE: &str = "tokenizer.json";

/// Current manifest format.
pub const FORMAT_VERSION: u32 = 1;

/// Architecture and file index of a trained model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub format_version: u32,
    pub architecture: ModelConfig,
    /// Class labels in id order.
    pub labels: LabelIndex,
    /// Weights file name, relative to the manifest.
    pub weights: String,
    /// Vocabulary file name, relative to the manifest.
    pub vocabulary: String,
}

impl ModelManifest {
    pub fn new(architecture: ModelConfig, labels: LabelIndex) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            architecture,
            labels,
            weights: WEIGHTS_FILE.to_string(),
            vocabulary: VOCABULARY_FILE.to_string(),
        }
    }

    /// Read `model.json` from `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(MANIFEST_FILE);
        if !path.exists() {
            return Err(AdlensError::ArtifactNotFound {
                path: path.display().to_string(),
            });
        }

        let manifest: Self = serde_json::from_reader(BufReader::new(File::open(&path)?))?;
        if manifest.format_version != FORMAT_VERSION {
            return Err(AdlensError::InvalidInput(format!(
                "unsupported manifest version {} in {}",
                manifest.format_version,
                path.display()
            )));
        }
        if manifest.labels.len() != manifest.architecture.num_classes {
            return Err(AdlensError::ShapeMismatch(format!(
                "manifest lists {} labels for {} output units",
                manifest.labels.len(),
                manifest.architecture.num_classes
            )));
        }
        Ok(manifest)
    }

    pub fn weights_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.weights)
    }

    pub fn vocabulary_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> ModelManifest {
        let (labels, _) = LabelIndex::fit(&["sports", "technology"]);
        ModelManifest::new(
            ModelConfig {
                vocab_size: 12,
                embedding_dim: 16,
                hidden_dim: 16,
                num_classes: 2,
                seq_len: 6,
            },
            labels,
        )
    }

    #[test]
    fn test_manifest_json_layout() {
        let json = serde_json::to_value(manifest()).unwrap();
        assert_eq!(json["format_version"], 1);
        assert_eq!(json["architecture"]["num_classes"], 2);
        assert_eq!(json["labels"][1], "technology");
        assert_eq!(json["weights"], WEIGHTS_FILE);
        assert_eq!(json["vocabulary"], VOCABULARY_FILE);
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            serde_json::to_string(&manifest()).unwrap(),
        )
        .unwrap();

        let loaded = ModelManifest::load(dir.path()).unwrap();
        assert_eq!(loaded, manifest());
        assert_eq!(
            loaded.weights_path(dir.path()),
            dir.path().join(WEIGHTS_FILE)
        );
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ModelManifest::load(dir.path()),
            Err(AdlensError::ArtifactNotFound { .. })
        ));
    }

    #[test]
    fn test_load_rejects_label_count_mismatch() {
        let mut bad = manifest();
        bad.architecture.num_classes = 3;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            serde_json::to_string(&bad).unwrap(),
        )
        .unwrap();

        assert!(matches!(
            ModelManifest::load(dir.path()),
            Err(AdlensError::ShapeMismatch(_))
        ));
    }
}
