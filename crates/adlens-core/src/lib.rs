//! # adlens Core
//!
//! Building blocks shared by the training pipeline and on-device inference:
//! tokenization, the frequency-ranked vocabulary, fixed-length sequence
//! encoding, label indexing, the bag-of-embeddings classifier and the
//! persisted artifact layout.
//!
//! ## Quick Start
//!
//! ```rust
//! use adlens_core::{LabelIndex, SequenceEncoder, Vocabulary};
//!
//! let texts = ["great phone", "win the game", "great phone"];
//! let vocab = Vocabulary::build(&texts, 5000).unwrap();
//! let encoder = SequenceEncoder::fit(&vocab, &texts, None);
//!
//! assert_eq!(encoder.encode(&vocab, "great phone"), vec![2, 3, 0]);
//!
//! let (labels, targets) = LabelIndex::fit(&["technology", "sports", "technology"]);
//! assert_eq!(labels.label(targets[0]), Some("technology"));
//! ```
pub mod ad_copy;
pub mod artifact;
pub mod error;
pub mod inference;
pub mod labels;
pub mod model;
pub mod text;

// Re-export primary API
pub use ad_copy::{AdCopy, AdCopyParser, parse_ad_copy};
pub use artifact::{MANIFEST_FILE, ModelManifest, VOCABULARY_FILE, WEIGHTS_FILE};
pub use error::{AdlensError, Result};
pub use inference::{Classifier, Prediction};
pub use labels::LabelIndex;
pub use model::{ModelConfig, TextClassifier};
pub use text::{OOV_ID, PAD_ID, SequenceEncoder, Tokenizer, Vocabulary};
