//! Bidirectional token ⇄ id index
//!
//! Vocabularies are persisted by the training pipeline as Keras
//! `Tokenizer.to_json()` documents. Ids are contiguous from 1; id 0 is the
//! padding sentinel and never resolves to a token.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{PredictorError, PredictorResult};

/// Canonical form of a token: trimmed and lowercased
pub fn normalize_token(token: &str) -> String {
    token.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    token_to_id: HashMap<String, u32>,
    /// Position `i` holds the token with id `i + 1`
    id_to_token: Vec<String>,
}

#[derive(Deserialize)]
struct TokenizerDocument {
    config: TokenizerConfig,
}

#[derive(Deserialize)]
struct TokenizerConfig {
    word_index: WordIndex,
}

/// Keras writes `word_index` as a JSON string nested inside the document
#[derive(Deserialize)]
#[serde(untagged)]
enum WordIndex {
    Encoded(String),
    Inline(HashMap<String, u32>),
}

impl Vocabulary {
    /// Build a vocabulary assigning ids 1.. in iteration order
    pub fn from_tokens<I, S>(tokens: I) -> PredictorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let word_index = tokens
            .into_iter()
            .zip(1u32..)
            .map(|(token, id)| (token.as_ref().to_string(), id))
            .collect::<Vec<_>>();

        let expected = word_index.len();
        let map: HashMap<String, u32> = word_index.into_iter().collect();
        if map.len() != expected {
            return Err(PredictorError::InvalidVocabulary(
                "duplicate tokens in token list".to_string(),
            ));
        }
        Self::from_word_index(map)
    }

    /// Build a vocabulary from a token → id map, enforcing the id invariants
    pub fn from_word_index(word_index: HashMap<String, u32>) -> PredictorResult<Self> {
        if word_index.is_empty() {
            return Err(PredictorError::InvalidVocabulary(
                "vocabulary is empty".to_string(),
            ));
        }

        let mut entries: Vec<(u32, String)> = Vec::with_capacity(word_index.len());
        let mut token_to_id = HashMap::with_capacity(word_index.len());

        for (raw, id) in word_index {
            let token = normalize_token(&raw);
            if token.is_empty() {
                return Err(PredictorError::InvalidVocabulary(format!(
                    "blank token with id {}",
                    id
                )));
            }
            if let Some(previous) = token_to_id.insert(token.clone(), id) {
                return Err(PredictorError::InvalidVocabulary(format!(
                    "token '{}' maps to both id {} and id {}",
                    token, previous, id
                )));
            }
            entries.push((id, token));
        }

        entries.sort_by_key(|(id, _)| *id);

        for (expected, (id, token)) in (1u32..).zip(entries.iter()) {
            if *id != expected {
                return Err(PredictorError::InvalidVocabulary(format!(
                    "ids must be contiguous from 1: expected id {}, found {} for '{}'",
                    expected, id, token
                )));
            }
        }

        let id_to_token = entries.into_iter().map(|(_, token)| token).collect();

        Ok(Self {
            token_to_id,
            id_to_token,
        })
    }

    /// Parse a Keras tokenizer JSON document
    pub fn from_keras_json(json: &str) -> PredictorResult<Self> {
        let document: TokenizerDocument = serde_json::from_str(json).map_err(|e| {
            PredictorError::InvalidVocabulary(format!("malformed tokenizer document: {}", e))
        })?;

        let word_index = match document.config.word_index {
            WordIndex::Inline(map) => map,
            WordIndex::Encoded(encoded) => serde_json::from_str(&encoded).map_err(|e| {
                PredictorError::InvalidVocabulary(format!("malformed word_index: {}", e))
            })?,
        };

        Self::from_word_index(word_index)
    }

    /// Load a Keras tokenizer JSON file
    pub fn load(path: &Path) -> PredictorResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PredictorError::artifact(path, e.to_string()))?;
        let vocabulary =
            Self::from_keras_json(&json).map_err(|e| PredictorError::artifact(path, e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            size = vocabulary.len(),
            "Loaded vocabulary"
        );
        Ok(vocabulary)
    }

    /// Id for a token, matched after trimming and lowercasing
    pub fn lookup_id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(&normalize_token(token)).copied()
    }

    /// Token for an id; id 0 and ids past the end resolve to nothing
    pub fn lookup_token(&self, id: u32) -> Option<&str> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.id_to_token.get(index).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.lookup_id(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    /// Tokens in id order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.id_to_token.iter().map(String::as_str)
    }

    /// SHA-256 over `id \t token \n` lines in id order, hex encoded
    ///
    /// Independent of the key order of the JSON document it was loaded from.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (id, token) in (1u32..).zip(self.id_to_token.iter()) {
            hasher.update(format!("{}\t{}\n", id, token).as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
