//! # Artifact Writer
//!
//! Persists a trained model as weights, manifest and vocabulary. Files are
//! staged under hidden temporary names and renamed into place with the
//! manifest last, so `model.json` only ever points at a complete set.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use adlens_core::{
    LabelIndex, MANIFEST_FILE, ModelManifest, VOCABULARY_FILE, Vocabulary, WEIGHTS_FILE,
};

use crate::error::TrainError;
use crate::trainer::TrainedModel;

/// Locations of the written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub manifest: PathBuf,
    pub weights: PathBuf,
    pub vocabulary: PathBuf,
}

pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write all artifacts of `trained` into the output directory.
    pub fn write(
        &self,
        trained: &TrainedModel,
        vocab: &Vocabulary,
        labels: &LabelIndex,
    ) -> Result<ArtifactPaths, TrainError> {
        fs::create_dir_all(&self.dir)?;

        let paths = ArtifactPaths {
            manifest: self.dir.join(MANIFEST_FILE),
            weights: self.dir.join(WEIGHTS_FILE),
            vocabulary: self.dir.join(VOCABULARY_FILE),
        };
        let staged = ArtifactPaths {
            manifest: self.staging_path(MANIFEST_FILE),
            weights: self.staging_path(WEIGHTS_FILE),
            vocabulary: self.staging_path(VOCABULARY_FILE),
        };

        if let Err(e) = self.stage(trained, vocab, labels, &staged) {
            remove_staged(&staged);
            return Err(e);
        }

        // Readers treat the manifest as the commit marker: retract the old
        // one before its weights and vocabulary are replaced.
        if paths.manifest.exists() {
            if let Err(e) = fs::remove_file(&paths.manifest) {
                remove_staged(&staged);
                return Err(e.into());
            }
        }
        let renames = [
            (&staged.vocabulary, &paths.vocabulary),
            (&staged.weights, &paths.weights),
            (&staged.manifest, &paths.manifest),
        ];
        for (from, to) in renames {
            if let Err(e) = fs::rename(from, to) {
                remove_staged(&staged);
                return Err(e.into());
            }
        }

        tracing::info!("Model artifacts written to {}", self.dir.display());
        Ok(paths)
    }

    fn stage(
        &self,
        trained: &TrainedModel,
        vocab: &Vocabulary,
        labels: &LabelIndex,
        staged: &ArtifactPaths,
    ) -> Result<(), TrainError> {
        write_json(&staged.vocabulary, vocab)?;
        tracing::debug!("Staged vocabulary ({} tokens)", vocab.len());

        trained.varmap.save(&staged.weights)?;
        File::open(&staged.weights)?.sync_all()?;
        tracing::debug!("Staged weights");

        let manifest = ModelManifest::new(trained.config, labels.clone());
        write_json(&staged.manifest, &manifest)?;
        Ok(())
    }

    fn staging_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!(".{name}.tmp"))
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), TrainError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn remove_staged(staged: &ArtifactPaths) {
    for path in [&staged.vocabulary, &staged.weights, &staged.manifest] {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}
