//! Train the ad interest classifier from a CSV corpus.

use std::path::PathBuf;

use adlens_trainer::{PipelineConfig, pipeline};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI arguments. Unset values fall back to the config file, then defaults.
#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train the ad interest classifier and write its artifacts")]
#[command(version)]
struct Cli {
    /// JSON pipeline configuration
    #[arg(short, long, env = "ADLENS_CONFIG")]
    config: Option<PathBuf>,

    /// CSV corpus with a header row
    #[arg(short, long, env = "ADLENS_INPUT")]
    input: Option<PathBuf>,

    /// Directory receiving model.json, model.safetensors and tokenizer.json
    #[arg(short, long, env = "ADLENS_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Header of the text column
    #[arg(long, env = "ADLENS_TEXT_COLUMN")]
    text_column: Option<String>,

    /// Header of the label column
    #[arg(long, env = "ADLENS_LABEL_COLUMN")]
    label_column: Option<String>,

    /// Cap on vocabulary ids, padding and OOV included
    #[arg(long, env = "ADLENS_MAX_VOCAB_SIZE")]
    max_vocab_size: Option<usize>,

    /// Cap on encoded sequence length
    #[arg(long, env = "ADLENS_MAX_SEQ_LEN")]
    max_seq_len: Option<usize>,

    #[arg(long, env = "ADLENS_EMBEDDING_DIM")]
    embedding_dim: Option<usize>,

    #[arg(long, env = "ADLENS_HIDDEN_DIM")]
    hidden_dim: Option<usize>,

    #[arg(short, long, env = "ADLENS_EPOCHS")]
    epochs: Option<usize>,

    #[arg(short, long, env = "ADLENS_BATCH_SIZE")]
    batch_size: Option<usize>,

    #[arg(long, env = "ADLENS_LEARNING_RATE")]
    learning_rate: Option<f64>,

    /// Shuffle seed
    #[arg(long, env = "ADLENS_SEED")]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(text_column) = self.text_column {
            config.text_column = text_column;
        }
        if let Some(label_column) = self.label_column {
            config.label_column = label_column;
        }
        if let Some(size) = self.max_vocab_size {
            config.max_vocab_size = size;
        }
        if self.max_seq_len.is_some() {
            config.max_seq_len = self.max_seq_len;
        }

        let train = &mut config.train;
        if let Some(dim) = self.embedding_dim {
            train.embedding_dim = dim;
        }
        if let Some(dim) = self.hidden_dim {
            train.hidden_dim = dim;
        }
        if let Some(epochs) = self.epochs {
            train.epochs = epochs;
        }
        if let Some(batch_size) = self.batch_size {
            train.batch_size = batch_size;
        }
        if let Some(lr) = self.learning_rate {
            train.learning_rate = lr;
        }
        if let Some(seed) = self.seed {
            train.seed = seed;
        }

        Ok(config)
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;

    info!("Starting classifier training from {}", config.input.display());
    let report = pipeline::run(&config).context("Training pipeline failed")?;

    if let Some(last) = report.final_metrics() {
        info!(
            "Trained on {} samples ({} skipped): loss {:.4}, accuracy {:.2}%",
            report.samples,
            report.skipped,
            last.loss,
            last.accuracy * 100.0
        );
    }
    info!("Model saved to {}", report.artifacts.manifest.display());
    info!("Vocabulary saved to {}", report.artifacts.vocabulary.display());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Training failed: {:#}", e);
        std::process::exit(1);
    }
}
