//! Classify stdin lines with a trained model, one JSON object per line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use adlens_core::Classifier;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adlens-predict")]
#[command(about = "Predict the ad interest category of each stdin line")]
#[command(version)]
struct Cli {
    /// Directory holding model.json, model.safetensors and tokenizer.json
    #[arg(short, long, env = "ADLENS_MODEL_DIR", default_value = "models/classifier")]
    model_dir: PathBuf,

    /// Label reported when a line cannot be classified
    #[arg(short, long, default_value = "general")]
    fallback: String,
}

#[derive(Debug, Serialize)]
struct PredictOutput {
    input: String,
    label: String,
    class_id: Option<u32>,
    confidence: Option<f32>,
    error: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let classifier = Classifier::load(&cli.model_dir)
        .with_context(|| format!("Failed to load model from {}", cli.model_dir.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = match classifier.predict(line) {
            Ok(prediction) => PredictOutput {
                input: line.to_string(),
                label: prediction.label,
                class_id: Some(prediction.class_id),
                confidence: Some(prediction.confidence),
                error: None,
            },
            Err(e) => PredictOutput {
                input: line.to_string(),
                label: cli.fallback.clone(),
                class_id: None,
                confidence: None,
                error: Some(e.to_string()),
            },
        };

        writeln!(out, "{}", serde_json::to_string(&output)?)?;
    }

    Ok(())
}
