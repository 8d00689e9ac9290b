pub mod encoder;
pub mod tokenizer;
pub mod vocab;

pub use encoder::SequenceEncoder;
pub use tokenizer::Tokenizer;
pub use vocab::{DEFAULT_MAX_SIZE, OOV_ID, OOV_TOKEN, PAD_ID, Vocabulary};
