//! Free-text symptom fields → fixed-width id sequence

use serde::Serialize;

use crate::config::Padding;
use crate::error::{PredictorError, PredictorResult};
use crate::vocabulary::{normalize_token, Vocabulary};

/// Id used to fill sequences up to the fixed width
pub const PADDING_ID: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    pub separator: char,
    pub padding: Padding,
    pub max_length: usize,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            separator: ';',
            padding: Padding::Pre,
            max_length: 9,
        }
    }
}

/// Fixed-length integer input for the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EncodedSequence(Vec<u32>);

impl EncodedSequence {
    pub fn ids(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of padding ids before the first token id
    pub fn leading_padding(&self) -> usize {
        self.0.iter().take_while(|&&id| id == PADDING_ID).count()
    }
}

impl From<Vec<u32>> for EncodedSequence {
    fn from(ids: Vec<u32>) -> Self {
        Self(ids)
    }
}

/// Join the fields, then trim and lowercase every separated token
///
/// `["  Vomiting ", "cramping"]` with `;` becomes `"vomiting;cramping"`.
/// A field may itself hold several separated tokens.
pub fn canonicalize<S: AsRef<str>>(fields: &[S], separator: char) -> String {
    let mut joined = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            joined.push(separator);
        }
        joined.push_str(field.as_ref());
    }

    joined
        .split(separator)
        .map(normalize_token)
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}

/// Bring an id sequence to exactly `max_length`
///
/// Over-long input keeps its last `max_length` ids, dropping the oldest ones.
pub fn pad_sequence(mut ids: Vec<u32>, max_length: usize, padding: Padding) -> EncodedSequence {
    if ids.len() > max_length {
        let excess = ids.len().saturating_sub(max_length);
        ids.drain(..excess);
    }

    let missing = max_length.saturating_sub(ids.len());
    match padding {
        Padding::Pre => {
            let mut padded = vec![PADDING_ID; missing];
            padded.extend(ids);
            EncodedSequence(padded)
        }
        Padding::Post => {
            ids.resize(max_length, PADDING_ID);
            EncodedSequence(ids)
        }
    }
}

pub struct SequenceEncoder<'a> {
    vocabulary: &'a Vocabulary,
    settings: EncoderSettings,
}

impl<'a> SequenceEncoder<'a> {
    pub fn new(vocabulary: &'a Vocabulary, settings: EncoderSettings) -> Self {
        Self {
            vocabulary,
            settings,
        }
    }

    /// Encode raw fields in caller-determined order
    ///
    /// Fails with [`PredictorError::UnknownSymptom`] on the first token the
    /// vocabulary does not know, empty tokens included.
    pub fn encode<S: AsRef<str>>(&self, fields: &[S]) -> PredictorResult<EncodedSequence> {
        let corpus = canonicalize(fields, self.settings.separator);
        self.encode_corpus(&corpus)
    }

    /// Encode an already canonical corpus string
    pub fn encode_corpus(&self, corpus: &str) -> PredictorResult<EncodedSequence> {
        let separator = self.settings.separator;

        if let Some(unknown) = corpus
            .split(separator)
            .find(|token| !self.vocabulary.contains(token))
        {
            return Err(PredictorError::UnknownSymptom {
                token: unknown.to_string(),
            });
        }

        // The whole corpus is tokenised as one text, empty pieces dropped
        let ids: Vec<u32> = corpus
            .split(separator)
            .filter(|token| !token.is_empty())
            .filter_map(|token| self.vocabulary.lookup_id(token))
            .collect();

        Ok(pad_sequence(
            ids,
            self.settings.max_length,
            self.settings.padding,
        ))
    }
}
