//! Categorical encoders
//!
//! Low-cardinality columns are one-hot encoded over the categories seen at
//! fit time. High-cardinality columns use a min-hash encoding of character
//! trigrams so the output width stays at `n_components` no matter how many
//! distinct values there are, and values never seen at fit time still land
//! near similar strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use xxhash_rust::xxh64::xxh64;

/// One-hot encoder over a fixed, sorted category list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OneHotEncoder {
    categories: Vec<String>,
}

impl OneHotEncoder {
    /// Fit on labels; `None` (missing) never becomes a category
    pub fn fit(labels: &[Option<String>]) -> Self {
        let categories: BTreeSet<&String> = labels.iter().flatten().collect();
        Self {
            categories: categories.into_iter().cloned().collect(),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Feature names `<column>_<category>`
    pub fn feature_names(&self, column: &str) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{}_{}", column, c))
            .collect()
    }

    /// Encode one label; unknown and missing labels give an all-zero row
    pub fn encode_into(&self, label: Option<&str>, out: &mut Vec<f32>) {
        let start = out.len();
        out.resize(start + self.categories.len(), 0.0);
        if let Some(label) = label {
            if let Ok(idx) = self.categories.binary_search_by(|c| c.as_str().cmp(label)) {
                out[start + idx] = 1.0;
            }
        }
    }
}

/// Base seed of the min-hash family; xxh64 output is fixed across platforms
/// and releases, so persisted encoders keep producing the same features
const MINHASH_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Min-hash encoder for high-cardinality strings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinHashEncoder {
    n_components: usize,
}

impl MinHashEncoder {
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components: n_components.max(1),
        }
    }

    pub fn width(&self) -> usize {
        self.n_components
    }

    /// Feature names `<column>_mh<k>`
    pub fn feature_names(&self, column: &str) -> Vec<String> {
        (0..self.n_components)
            .map(|k| format!("{}_mh{}", column, k))
            .collect()
    }

    /// Encode one label into `n_components` values in [0, 1]
    ///
    /// Component `k` is the smallest normalised hash of the label's character
    /// trigrams under hash function `k`. Missing labels give zeros.
    pub fn encode_into(&self, label: Option<&str>, out: &mut Vec<f32>) {
        let start = out.len();
        out.resize(start + self.n_components, 0.0);
        let Some(label) = label else {
            return;
        };

        let trigrams = char_trigrams(&label.to_lowercase());
        for k in 0..self.n_components {
            let seed = MINHASH_SEED.wrapping_add(k as u64);
            let min = trigrams
                .iter()
                .map(|t| xxh64(t.as_bytes(), seed))
                .min()
                .unwrap_or(u64::MAX);
            out[start + k] = (min as f64 / u64::MAX as f64) as f32;
        }
    }
}

/// Character trigrams of a space-padded string
pub(crate) fn char_trigrams(s: &str) -> BTreeSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn test_one_hot_sorted_categories() {
        let enc = OneHotEncoder::fit(&labels(&["b", "a", "b", "c"]));
        assert_eq!(enc.categories(), &["a", "b", "c"]);
        assert_eq!(enc.feature_names("col"), vec!["col_a", "col_b", "col_c"]);

        let mut out = Vec::new();
        enc.encode_into(Some("b"), &mut out);
        enc.encode_into(Some("zzz"), &mut out);
        enc.encode_into(None, &mut out);
        assert_eq!(out, vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_minhash_deterministic_and_bounded() {
        let enc = MinHashEncoder::new(8);
        let mut a = Vec::new();
        let mut b = Vec::new();
        enc.encode_into(Some("prosciutto cotto"), &mut a);
        enc.encode_into(Some("prosciutto cotto"), &mut b);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert!(a.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_minhash_similar_strings_share_components() {
        let enc = MinHashEncoder::new(32);
        let encode = |s: &str| {
            let mut out = Vec::new();
            enc.encode_into(Some(s), &mut out);
            out
        };
        let a = encode("prosciutto cotto");
        let b = encode("prosciutto crudo");
        let c = encode("organic bananas");
        let shared = |x: &[f32], y: &[f32]| x.iter().zip(y).filter(|(p, q)| p == q).count();
        assert!(shared(&a, &b) > shared(&a, &c));
    }

    #[test]
    fn test_minhash_values_are_pinned() {
        // persisted encoders must keep producing these exact components
        assert_eq!(xxh64(b"abc", 0), 0x44bc_2cf5_ad77_0999);
        let mut out = Vec::new();
        MinHashEncoder::new(2).encode_into(Some("ab"), &mut out);
        assert!((out[0] - 0.073_395_74).abs() < 1e-6, "{out:?}");
        assert!((out[1] - 0.310_987_86).abs() < 1e-6, "{out:?}");
    }

    #[test]
    fn test_minhash_missing_is_zero() {
        let enc = MinHashEncoder::new(4);
        let mut out = Vec::new();
        enc.encode_into(None, &mut out);
        assert_eq!(out, vec![0.0; 4]);
    }
}
