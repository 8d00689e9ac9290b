//! # Training Pipeline
//!
//! Runs the stages of a training job in order, handing each stage's output to
//! the next: corpus → vocabulary → sequence encoder → label index → encoded
//! dataset → trained model → artifacts. Nothing is written to the output
//! directory unless every earlier stage succeeded.

use std::path::PathBuf;

use adlens_core::{LabelIndex, SequenceEncoder, Vocabulary};

use crate::artifacts::{ArtifactPaths, ArtifactWriter};
use crate::config::PipelineConfig;
use crate::data::{EncodedDataset, load_csv_corpus};
use crate::error::TrainError;
use crate::trainer::{EpochMetrics, Trainer};

/// Summary of a finished training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub input: PathBuf,
    pub samples: usize,
    pub skipped: usize,
    /// Vocabulary ids, padding and OOV included.
    pub vocab_size: usize,
    pub labels: Vec<String>,
    pub seq_len: usize,
    pub history: Vec<EpochMetrics>,
    pub artifacts: ArtifactPaths,
}

impl TrainingReport {
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.history.last()
    }
}

/// Train a classifier as described by `config` and write its artifacts.
pub fn run(config: &PipelineConfig) -> Result<TrainingReport, TrainError> {
    config.validate()?;

    let corpus = load_csv_corpus(&config.input, &config.text_column, &config.label_column)?;
    let texts = corpus.texts();

    let vocab = Vocabulary::build(&texts, config.max_vocab_size)?;
    tracing::info!("Vocabulary: {} tokens ({} ids)", vocab.len(), vocab.size());

    let encoder = SequenceEncoder::fit(&vocab, &texts, config.max_seq_len);
    let (labels, targets) = LabelIndex::fit(&corpus.labels());
    tracing::info!(
        "Sequence length {}, {} classes: {}",
        encoder.seq_len(),
        labels.len(),
        labels.labels().join(", ")
    );

    let dataset = EncodedDataset::new(
        encoder.encode_batch(&vocab, &texts),
        targets,
        encoder.seq_len(),
    )?;

    let trained = Trainer::new(config.train.clone()).fit(&dataset, vocab.size(), labels.len())?;
    let artifacts = ArtifactWriter::new(&config.output_dir).write(&trained, &vocab, &labels)?;

    Ok(TrainingReport {
        input: config.input.clone(),
        samples: corpus.len(),
        skipped: corpus.skipped,
        vocab_size: vocab.size(),
        labels: labels.labels().to_vec(),
        seq_len: encoder.seq_len(),
        history: trained.history,
        artifacts,
    })
}
