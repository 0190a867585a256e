//! Column classification
//!
//! Assigns every column of a dirty table a [`ColumnKind`] using cheap probes:
//! cell types, parseability, distinct-value counts and words per cell.
//! Classification is a pure function of the table and the cardinality
//! threshold.

use crate::datetime::parse_datetime;
use featgraph_core::cell::{as_bool, as_f64, as_label, is_missing, word_count};
use featgraph_core::{Column, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ahash::AHashSet;

/// Mean words per cell above which a string column is a text candidate
///
/// Candidates are only provisional: the router keeps or demotes them against
/// the caller's `min_words`.
pub const PROSE_MIN_WORDS: f32 = 1.0;

/// Semantic kind of a column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Numbers or numeric strings - imputed and scaled
    Numeric,
    /// true/false values - a single 0/1 column
    Boolean,
    /// Strings with at most `cardinality_threshold` distinct values - one-hot
    CategoricalLow,
    /// Strings with more distinct values than the threshold - min-hash
    CategoricalHigh,
    /// Prose - candidate for the sentence encoder
    Text,
    /// Date/time strings - expanded into calendar parts
    DateTime,
    /// Array cells - multi-label binarized
    List,
}

impl ColumnKind {
    /// Categorical kind for a string column with `n_distinct` values
    #[inline]
    pub fn categorical(n_distinct: usize, cardinality_threshold: usize) -> Self {
        if n_distinct > cardinality_threshold {
            ColumnKind::CategoricalHigh
        } else {
            ColumnKind::CategoricalLow
        }
    }

    pub fn is_categorical(self) -> bool {
        matches!(self, ColumnKind::CategoricalLow | ColumnKind::CategoricalHigh)
    }
}

/// Kind of a column together with the probe statistics behind it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Distinct non-missing labels
    pub n_distinct: usize,
    /// Fraction of rows holding a string with at least one word
    pub text_abundance: f32,
    /// Mean word count over the non-missing string cells
    pub mean_words: f32,
}

impl ColumnProfile {
    /// Same column handled as a plain categorical
    #[must_use]
    pub fn demoted(&self, cardinality_threshold: usize) -> Self {
        Self {
            kind: ColumnKind::categorical(self.n_distinct, cardinality_threshold),
            ..self.clone()
        }
    }
}

/// Classify every column of `table`
pub fn classify_table(table: &Table, cardinality_threshold: usize) -> Vec<ColumnProfile> {
    table
        .columns()
        .iter()
        .map(|c| classify_column(c, cardinality_threshold))
        .collect()
}

/// Classify a single column
pub fn classify_column(column: &Column, cardinality_threshold: usize) -> ColumnProfile {
    let present: Vec<&Value> = column.values.iter().filter(|v| !is_missing(v)).collect();

    let n_distinct = present
        .iter()
        .filter_map(|v| as_label(v))
        .collect::<AHashSet<_>>()
        .len();

    let strings: Vec<&Value> = present.iter().copied().filter(|v| v.is_string()).collect();
    let worded = strings.iter().filter(|v| word_count(v) > 0).count();
    let text_abundance = if column.is_empty() {
        0.0
    } else {
        worded as f32 / column.len() as f32
    };
    let mean_words = if strings.is_empty() {
        0.0
    } else {
        strings.iter().map(|v| word_count(v)).sum::<usize>() as f32 / strings.len() as f32
    };

    let kind = detect_kind(&present, n_distinct, mean_words, cardinality_threshold);

    ColumnProfile {
        name: column.name.clone(),
        kind,
        n_distinct,
        text_abundance,
        mean_words,
    }
}

fn detect_kind(
    present: &[&Value],
    n_distinct: usize,
    mean_words: f32,
    cardinality_threshold: usize,
) -> ColumnKind {
    if present.is_empty() {
        return ColumnKind::CategoricalLow;
    }
    if present.iter().any(|v| v.is_array()) {
        return ColumnKind::List;
    }
    if present.iter().all(|v| as_bool(v).is_some()) {
        return ColumnKind::Boolean;
    }
    if present.iter().all(|v| as_f64(v).is_some()) {
        return ColumnKind::Numeric;
    }
    if present
        .iter()
        .all(|v| v.as_str().and_then(parse_datetime).is_some())
    {
        return ColumnKind::DateTime;
    }
    if mean_words > PROSE_MIN_WORDS {
        return ColumnKind::Text;
    }
    ColumnKind::categorical(n_distinct, cardinality_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kind_of(values: Vec<Value>, threshold: usize) -> ColumnKind {
        classify_column(&Column::new("c", values), threshold).kind
    }

    #[test]
    fn test_numeric_and_numeric_strings() {
        assert_eq!(kind_of(vec![json!(1), json!(2.5), json!(null)], 40), ColumnKind::Numeric);
        assert_eq!(kind_of(vec![json!("0.5"), json!("1.5")], 40), ColumnKind::Numeric);
    }

    #[test]
    fn test_boolean_before_numeric() {
        assert_eq!(kind_of(vec![json!(true), json!(false)], 40), ColumnKind::Boolean);
        assert_eq!(kind_of(vec![json!("True"), json!("False")], 40), ColumnKind::Boolean);
        assert_eq!(kind_of(vec![json!(0), json!(1)], 40), ColumnKind::Numeric);
    }

    #[test]
    fn test_list_regardless_of_elements() {
        assert_eq!(kind_of(vec![json!([1]), json!(["a", false]), json!([])], 40), ColumnKind::List);
    }

    #[test]
    fn test_datetime() {
        let values = vec![json!("2018-01-01 00:00:00"), json!("2018-01-05")];
        assert_eq!(kind_of(values, 40), ColumnKind::DateTime);
    }

    #[test]
    fn test_text_and_cardinality() {
        let prose = vec![json!("here we have a sentence"), json!("and another one here")];
        assert_eq!(kind_of(prose, 40), ColumnKind::Text);

        let short = vec![json!("new york"), json!("paris"), json!("los angeles"), json!("rome")];
        assert_eq!(kind_of(short, 40), ColumnKind::Text);

        let labels = vec![json!("a"), json!("b"), json!("c"), json!("d")];
        assert_eq!(kind_of(labels.clone(), 40), ColumnKind::CategoricalLow);
        assert_eq!(kind_of(labels, 3), ColumnKind::CategoricalHigh);
    }

    #[test]
    fn test_profile_stats() {
        let profile = classify_column(
            &Column::new("t", vec![json!("one two three"), json!("four"), json!(null), json!(7)]),
            40,
        );
        assert_eq!(profile.n_distinct, 3);
        assert!((profile.text_abundance - 0.5).abs() < 1e-6);
        assert!((profile.mean_words - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_all_missing_is_categorical() {
        assert_eq!(kind_of(vec![json!(null), json!("")], 40), ColumnKind::CategoricalLow);
    }
}
