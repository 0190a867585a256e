//! Sentence encoder
//!
//! Turns free text into a fixed-width dense vector. The encoder is identified
//! by a model name so fitted state records which embedding space a column was
//! encoded into; the width follows the named model.
//!
//! The bundled implementation is a hashed bag of words, word bigrams and
//! character trigrams, L2-normalised. It needs no model download and is fully
//! deterministic, so the same text always lands on the same vector.

use crate::categorical::char_trigrams;
use xxhash_rust::xxh64::xxh64;
use featgraph_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default sentence model
pub const DEFAULT_MODEL_NAME: &str = "paraphrase-MiniLM-L6-v2";

/// Known model names and their embedding widths
const KNOWN_MODELS: [(&str, usize); 5] = [
    ("paraphrase-MiniLM-L6-v2", 384),
    ("all-MiniLM-L6-v2", 384),
    ("paraphrase-multilingual-MiniLM-L12-v2", 384),
    ("all-mpnet-base-v2", 768),
    ("paraphrase-mpnet-base-v2", 768),
];

const TEXT_HASH_SEED: u64 = 0x243f_6a88_85a3_08d3;

/// Sentence encoder bound to a model name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentenceEncoder {
    model_name: String,
    dim: usize,
}

impl SentenceEncoder {
    /// Resolve a model by name
    pub fn from_model_name(model_name: &str) -> Result<Self> {
        let name = model_name.trim();
        let name = name.strip_prefix("sentence-transformers/").unwrap_or(name);
        KNOWN_MODELS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(known, dim)| Self {
                model_name: known.to_string(),
                dim: *dim,
            })
            .ok_or_else(|| {
                let known: Vec<&str> = KNOWN_MODELS.iter().map(|(n, _)| *n).collect();
                Error::config(format!(
                    "unknown text model_name '{}'; known models: {:?}",
                    model_name, known
                ))
            })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Feature names `<column>_emb<k>`
    pub fn feature_names(&self, column: &str) -> Vec<String> {
        (0..self.dim).map(|k| format!("{}_emb{}", column, k)).collect()
    }

    /// Encode a text; missing text encodes to zeros
    pub fn encode(&self, text: Option<&str>) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        let Some(text) = text else {
            return vector;
        };

        let normalized = text.to_lowercase();
        let words: Vec<&str> = normalized
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty())
            .collect();

        let mut add = |token: &str, weight: f32| {
            let hash = xxh64(token.as_bytes(), TEXT_HASH_SEED);
            let pos = (hash % self.dim as u64) as usize;
            // sign bit decorrelates collisions
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[pos] += sign * weight;
        };

        for word in &words {
            add(word, 2.0);
            for trigram in char_trigrams(word) {
                add(&trigram, 0.5);
            }
        }
        for pair in words.windows(2) {
            add(&format!("{} {}", pair[0], pair[1]), 1.0);
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for v in &mut vector {
                *v /= magnitude;
            }
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_known_and_unknown_models() {
        let enc = SentenceEncoder::from_model_name("paraphrase-MiniLM-L6-v2").unwrap();
        assert_eq!(enc.dim(), 384);
        let mpnet = SentenceEncoder::from_model_name("sentence-transformers/all-mpnet-base-v2").unwrap();
        assert_eq!(mpnet.dim(), 768);
        assert!(matches!(
            SentenceEncoder::from_model_name("gpt-17"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_encode_normalized_and_deterministic() {
        let enc = SentenceEncoder::from_model_name(DEFAULT_MODEL_NAME).unwrap();
        let v1 = enc.encode(Some("Graphistry is an amazing tool!"));
        let v2 = enc.encode(Some("Graphistry is an amazing tool!"));
        assert_eq!(v1, v2);
        let magnitude: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-4);
        assert_eq!(enc.encode(None), vec![0.0; 384]);
    }

    #[test]
    fn test_encoding_is_pinned() {
        let enc = SentenceEncoder::from_model_name(DEFAULT_MODEL_NAME).unwrap();
        let v = enc.encode(Some("cat"));
        let nonzero: Vec<usize> = (0..v.len()).filter(|&i| v[i] != 0.0).collect();
        assert_eq!(nonzero, vec![49, 155, 223, 298, 339]);
        assert!((v[49] + 0.928_48).abs() < 1e-4);
        assert!((v[155] - 0.185_70).abs() < 1e-4);
    }

    #[test]
    fn test_similar_sentences_closer() {
        let enc = SentenceEncoder::from_model_name(DEFAULT_MODEL_NAME).unwrap();
        let a = enc.encode(Some("the cat sat on the mat"));
        let b = enc.encode(Some("the cat sat on a mat"));
        let c = enc.encode(Some("quarterly revenue exceeded forecasts"));
        assert!(cosine(&a, &b) > cosine(&a, &c));
    }
}
