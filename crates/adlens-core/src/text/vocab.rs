//! Frequency-ranked word vocabulary.
//!
//! Id layout:
//! - `0`: padding, never assigned to a token
//! - `1`: out-of-vocabulary (`<OOV>`)
//! - `2..`: word tokens by descending corpus frequency, ties by first occurrence

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{AdlensError, Result};
use crate::text::tokenizer::Tokenizer;

/// Id used to pad encoded sequences.
pub const PAD_ID: u32 = 0;

/// Id shared by every token missing from the vocabulary.
pub const OOV_ID: u32 = 1;

/// Token persisted for [`OOV_ID`].
pub const OOV_TOKEN: &str = "<OOV>";

/// Default cap on the number of ids, reserved ids included.
pub const DEFAULT_MAX_SIZE: usize = 5000;

const FIRST_WORD_ID: u32 = 2;

/// Token to id mapping built once from a training corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    tokenizer: Tokenizer,
    /// Word tokens in id order, starting at id 2.
    tokens: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    /// Build a vocabulary from `texts`, keeping at most `max_size` ids.
    ///
    /// `max_size` counts the padding and OOV ids, so at most `max_size - 2`
    /// word tokens are kept. Dropped tokens encode to [`OOV_ID`].
    pub fn build<S: AsRef<str>>(texts: &[S], max_size: usize) -> Result<Self> {
        if texts.is_empty() {
            return Err(AdlensError::InvalidInput(
                "cannot build a vocabulary from an empty corpus".into(),
            ));
        }
        if max_size <= FIRST_WORD_ID as usize {
            return Err(AdlensError::InvalidInput(format!(
                "vocabulary size {max_size} leaves no room for word tokens (minimum 3)"
            )));
        }

        let tokenizer = Tokenizer::new();

        // token -> (count, first seen position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut seen = 0usize;
        for text in texts {
            for token in tokenizer.tokenize(text.as_ref()) {
                let entry = counts.entry(token).or_insert((0, seen));
                entry.0 += 1;
                seen += 1;
            }
        }

        if counts.is_empty() {
            return Err(AdlensError::InvalidInput(
                "corpus does not contain a single token".into(),
            ));
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(token, (count, first))| (token, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let keep = max_size - FIRST_WORD_ID as usize;
        if ranked.len() > keep {
            tracing::debug!(
                "Vocabulary capped: keeping {} of {} distinct tokens",
                keep,
                ranked.len()
            );
            ranked.truncate(keep);
        }

        let tokens: Vec<String> = ranked.into_iter().map(|(token, _, _)| token).collect();
        Ok(Self::from_tokens(tokens))
    }

    fn from_tokens(tokens: Vec<String>) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), FIRST_WORD_ID + i as u32))
            .collect();

        Self {
            tokenizer: Tokenizer::new(),
            tokens,
            index,
        }
    }

    /// Tokenizer this vocabulary was built with.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Number of word tokens, reserved ids excluded.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the vocabulary holds no word tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of distinct ids, padding and OOV included.
    ///
    /// This is the number of rows an embedding table needs.
    pub fn size(&self) -> usize {
        self.tokens.len() + FIRST_WORD_ID as usize
    }

    /// Id for `token`, [`OOV_ID`] if unknown.
    pub fn id(&self, token: &str) -> u32 {
        self.index.get(token).copied().unwrap_or(OOV_ID)
    }

    /// Token for `id`, if it is a word token or the OOV id.
    pub fn token(&self, id: u32) -> Option<&str> {
        match id {
            PAD_ID => None,
            OOV_ID => Some(OOV_TOKEN),
            _ => self
                .tokens
                .get((id - FIRST_WORD_ID) as usize)
                .map(String::as_str),
        }
    }

    /// Tokenize `text` and map every token to its id, without padding.
    pub fn to_ids(&self, text: &str) -> Vec<u32> {
        self.tokenizer
            .tokenize(text)
            .iter()
            .map(|token| self.id(token))
            .collect()
    }

    /// Write the token to id mapping as a JSON object.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a mapping previously written by [`Vocabulary::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AdlensError::ArtifactNotFound {
                path: path.display().to_string(),
            });
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Serialize for Vocabulary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tokens.len() + 1))?;
        map.serialize_entry(OOV_TOKEN, &OOV_ID)?;
        for (i, token) in self.tokens.iter().enumerate() {
            map.serialize_entry(token, &(FIRST_WORD_ID + i as u32))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Vocabulary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(VocabularyVisitor)
    }
}

struct VocabularyVisitor;

impl<'de> Visitor<'de> for VocabularyVisitor {
    type Value = Vocabulary;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from token to id with dense ids starting at 2")
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, u32)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        let mut seen: HashSet<String> = HashSet::new();
        let mut has_oov = false;

        while let Some((token, id)) = access.next_entry::<String, u32>()? {
            if !seen.insert(token.clone()) {
                return Err(de::Error::custom(format!("duplicate token {token:?}")));
            }
            if token == OOV_TOKEN {
                if id != OOV_ID {
                    return Err(de::Error::custom(format!(
                        "{OOV_TOKEN} must map to {OOV_ID}, found {id}"
                    )));
                }
                has_oov = true;
                continue;
            }
            entries.push((token, id));
        }

        if !has_oov {
            return Err(de::Error::custom(format!("missing {OOV_TOKEN} entry")));
        }

        entries.sort_by_key(|(_, id)| *id);
        for (i, (token, id)) in entries.iter().enumerate() {
            let expected = FIRST_WORD_ID + i as u32;
            if *id != expected {
                return Err(de::Error::custom(format!(
                    "token {token:?} has id {id}, expected {expected}: ids must be dense and unique"
                )));
            }
        }

        Ok(Vocabulary::from_tokens(
            entries.into_iter().map(|(token, _)| token).collect(),
        ))
    }
}
