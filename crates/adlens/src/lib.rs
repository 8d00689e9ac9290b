//! # adlens
//!
//! Ad interest classification that runs next to the user: an offline
//! training job turns a labelled corpus into a small classifier, and the
//! [`Classifier`] loads its artifacts to predict a category for page text.
//!
//! ```no_run
//! use adlens::{Classifier, PipelineConfig, pipeline};
//!
//! let config = PipelineConfig::new()
//!     .with_input("data/training/ads.csv")
//!     .with_output_dir("models/classifier");
//! pipeline::run(&config)?;
//!
//! let classifier = Classifier::load("models/classifier")?;
//! let _category = classifier.predict_or("new phone deals this week", "general");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use adlens_core::*;
pub use adlens_trainer::{
    ArtifactPaths, ArtifactWriter, Corpus, EncodedDataset, EpochMetrics, PipelineConfig, Sample,
    TrainConfig, TrainError, TrainedModel, Trainer, TrainingReport, load_csv_corpus, pipeline,
};
