//! # adlens Trainer
//!
//! Offline training job for the ad interest classifier. Reads a labelled CSV
//! corpus, builds the vocabulary and label index, fits the classifier and
//! writes the artifacts the inference side loads.

pub mod artifacts;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod trainer;

pub use artifacts::{ArtifactPaths, ArtifactWriter};
pub use config::{PipelineConfig, TrainConfig};
pub use data::{Corpus, EncodedDataset, Sample, load_csv_corpus};
pub use error::TrainError;
pub use pipeline::{TrainingReport, run};
pub use trainer::{EpochMetrics, TrainedModel, Trainer};
