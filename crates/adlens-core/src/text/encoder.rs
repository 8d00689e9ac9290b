//! Fixed-length sequence encoding.

use crate::text::vocab::{PAD_ID, Vocabulary};

/// Maps text to id sequences of one fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceEncoder {
    seq_len: usize,
}

impl SequenceEncoder {
    /// Create an encoder producing sequences of `seq_len` ids.
    ///
    /// A length of zero is raised to one so every text has a slot.
    pub fn new(seq_len: usize) -> Self {
        Self {
            seq_len: seq_len.max(1),
        }
    }

    /// Derive the sequence length from a corpus.
    ///
    /// The length is the largest token count among `texts`, lowered to `cap`
    /// when one is given.
    pub fn fit<S: AsRef<str>>(vocab: &Vocabulary, texts: &[S], cap: Option<usize>) -> Self {
        let longest = texts
            .iter()
            .map(|text| vocab.tokenizer().count(text.as_ref()))
            .max()
            .unwrap_or(0);

        let seq_len = match cap {
            Some(cap) => longest.min(cap),
            None => longest,
        };

        tracing::debug!("Sequence length fitted to {} (longest text: {})", seq_len, longest);
        Self::new(seq_len)
    }

    /// Length of every sequence this encoder produces.
    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Encode one text: unknown tokens become the OOV id, long texts are
    /// truncated at the end and short ones are padded at the end.
    pub fn encode(&self, vocab: &Vocabulary, text: &str) -> Vec<u32> {
        let mut ids = vocab.to_ids(text);
        ids.truncate(self.seq_len);
        ids.resize(self.seq_len, PAD_ID);
        ids
    }

    /// Encode every text in order.
    pub fn encode_batch<S: AsRef<str>>(&self, vocab: &Vocabulary, texts: &[S]) -> Vec<Vec<u32>> {
        texts
            .iter()
            .map(|text| self.encode(vocab, text.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::vocab::OOV_ID;

    fn vocab() -> Vocabulary {
        Vocabulary::build(&["great phone", "win the game", "great phone"], 5000).unwrap()
    }

    #[test]
    fn test_fit_uses_longest_text() {
        let texts = ["great phone", "win the game", "great phone"];
        let encoder = SequenceEncoder::fit(&vocab(), &texts, None);
        assert_eq!(encoder.seq_len(), 3);
    }

    #[test]
    fn test_fit_respects_cap() {
        let texts = ["great phone", "win the game"];
        assert_eq!(SequenceEncoder::fit(&vocab(), &texts, Some(2)).seq_len(), 2);
        assert_eq!(SequenceEncoder::fit(&vocab(), &texts, Some(10)).seq_len(), 3);
    }

    #[test]
    fn test_pads_at_end() {
        let encoder = SequenceEncoder::new(3);
        assert_eq!(encoder.encode(&vocab(), "great phone"), vec![2, 3, PAD_ID]);
    }

    #[test]
    fn test_truncates_at_end() {
        let encoder = SequenceEncoder::new(2);
        assert_eq!(encoder.encode(&vocab(), "win the game"), vec![4, 5]);
    }

    #[test]
    fn test_unknown_tokens() {
        let encoder = SequenceEncoder::new(4);
        assert_eq!(
            encoder.encode(&vocab(), "great new tablet"),
            vec![2, OOV_ID, OOV_ID, PAD_ID]
        );
    }

    #[test]
    fn test_length_is_constant() {
        let vocab = vocab();
        let encoder = SequenceEncoder::new(3);
        let inputs = [
            "",
            "great",
            "great phone",
            "win the game",
            "win the game great phone great phone win",
        ];
        for input in inputs {
            assert_eq!(encoder.encode(&vocab, input).len(), 3, "input {input:?}");
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let vocab = vocab();
        let encoder = SequenceEncoder::new(5);
        let first = encoder.encode(&vocab, "Win the GAME, great phone");
        let second = encoder.encode(&vocab, "Win the GAME, great phone");
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_length_is_raised() {
        assert_eq!(SequenceEncoder::new(0).seq_len(), 1);
    }

    #[test]
    fn test_encode_batch_keeps_order() {
        let vocab = vocab();
        let encoder = SequenceEncoder::new(3);
        let encoded = encoder.encode_batch(&vocab, &["great phone", "win the game", "great phone"]);
        assert_eq!(encoded.len(), 3);
        assert_eq!(encoded[0], encoded[2]);
        assert_eq!(encoded[1], vec![4, 5, 6]);
    }
}
