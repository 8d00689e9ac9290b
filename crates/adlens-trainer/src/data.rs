//! Corpus loading and the encoded training set.

use std::path::Path;

use adlens_core::AdlensError;

use crate::error::TrainError;

/// A single training example: one CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub text: String,
    pub label: String,
}

impl Sample {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Samples read from a corpus file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub samples: Vec<Sample>,
    /// Rows dropped because a field was missing, blank or undecodable.
    pub skipped: usize,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.label.as_str()).collect()
    }
}

/// Load a CSV corpus with a header row.
///
/// Rows with a missing or blank text/label field are skipped with a warning.
pub fn load_csv_corpus<P: AsRef<Path>>(
    path: P,
    text_column: &str,
    label_column: &str,
) -> Result<Corpus, TrainError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(TrainError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(TrainError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TrainError::MissingColumn {
                column: name.to_string(),
                path: path.to_path_buf(),
            })
    };
    let text_idx = column(text_column)?;
    let label_idx = column(label_column)?;

    let mut corpus = Corpus::default();
    for (row, record) in reader.records().enumerate() {
        // header is line 1
        let line = row + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping row at line {}: {}", line, e);
                corpus.skipped += 1;
                continue;
            }
        };

        let text = record.get(text_idx).unwrap_or("");
        let label = record.get(label_idx).unwrap_or("");
        if text.is_empty() || label.is_empty() {
            tracing::warn!(
                "Skipping row at line {}: missing {} field",
                line,
                if text.is_empty() { text_column } else { label_column }
            );
            corpus.skipped += 1;
            continue;
        }

        corpus.samples.push(Sample::new(text, label));
    }

    if corpus.is_empty() {
        return Err(TrainError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(
        "Loaded {} samples from {} ({} skipped)",
        corpus.len(),
        path.display(),
        corpus.skipped
    );
    Ok(corpus)
}

/// Encoded sequences and class ids ready for the trainer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDataset {
    sequences: Vec<Vec<u32>>,
    targets: Vec<u32>,
    seq_len: usize,
}

impl EncodedDataset {
    /// Pair every sequence with its class id.
    pub fn new(
        sequences: Vec<Vec<u32>>,
        targets: Vec<u32>,
        seq_len: usize,
    ) -> Result<Self, AdlensError> {
        if sequences.len() != targets.len() {
            return Err(AdlensError::ShapeMismatch(format!(
                "{} sequences but {} targets",
                sequences.len(),
                targets.len()
            )));
        }
        Ok(Self {
            sequences,
            targets,
            seq_len,
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn sequences(&self) -> &[Vec<u32>] {
        &self.sequences
    }

    pub fn targets(&self) -> &[u32] {
        &self.targets
    }

    /// Check every sequence and target against the model dimensions.
    pub fn check_shapes(&self, vocab_size: usize, num_classes: usize) -> Result<(), AdlensError> {
        for (row, sequence) in self.sequences.iter().enumerate() {
            if sequence.len() != self.seq_len {
                return Err(AdlensError::ShapeMismatch(format!(
                    "sample {row} has {} ids, expected {}",
                    sequence.len(),
                    self.seq_len
                )));
            }
            if let Some(&id) = sequence.iter().find(|&&id| id as usize >= vocab_size) {
                return Err(AdlensError::ShapeMismatch(format!(
                    "sample {row} contains id {id} but the vocabulary size is {vocab_size}"
                )));
            }
        }
        if let Some(&target) = self.targets.iter().find(|&&t| t as usize >= num_classes) {
            return Err(AdlensError::ShapeMismatch(format!(
                "class id {target} but the model has {num_classes} classes"
            )));
        }
        Ok(())
    }

    /// Flattened ids and targets for the samples at `indices`.
    pub fn gather(&self, indices: &[usize]) -> (Vec<u32>, Vec<u32>) {
        let mut ids = Vec::with_capacity(indices.len() * self.seq_len);
        let mut targets = Vec::with_capacity(indices.len());
        for &i in indices {
            ids.extend_from_slice(&self.sequences[i]);
            targets.push(self.targets[i]);
        }
        (ids, targets)
    }
}
