//! Text routing
//!
//! Decides, per table, which prose-looking columns go to the sentence encoder
//! and which fall back to categorical handling.
//!
//! - `min_words` at or below [`MIN_WORDS_FLOOR`] is rejected: at one word per
//!   entry every label column would qualify as "text".
//! - a text candidate whose mean word count is below `min_words` is demoted,
//!   so an outsized `min_words` quietly routes everything to the generic
//!   encoders.
//! - when the fraction of rows holding real text is below `confidence`, all
//!   text columns are demoted.

use crate::kind::{ColumnKind, ColumnProfile};
use featgraph_core::cell::word_count;
use featgraph_core::{Error, Result, Table};
use tracing::debug;

/// `min_words` must be strictly above this
pub const MIN_WORDS_FLOOR: f32 = 1.0;

/// Routing thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRouting {
    pub confidence: f32,
    pub min_words: f32,
}

impl TextRouting {
    pub fn validate(&self) -> Result<()> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(Error::config(format!(
                "confidence must lie in [0, 1], got {}",
                self.confidence
            )));
        }
        if !self.min_words.is_finite() || self.min_words < 0.0 {
            return Err(Error::config(format!(
                "min_words must be a non-negative number, got {}",
                self.min_words
            )));
        }
        if self.min_words <= MIN_WORDS_FLOOR {
            return Err(Error::config(format!(
                "min_words = {} is too few words to justify text encoding: every label would \
                 count as text. It is best to have at least a word or two per entry, and we \
                 need at least roughly one real word per entry beyond a bare label; \
                 use min_words > {}",
                self.min_words, MIN_WORDS_FLOOR
            )));
        }
        Ok(())
    }
}

/// Route text candidates of `table` given their profiles
///
/// Returns the profiles with every rejected text column demoted to its
/// categorical kind. Non-text profiles pass through untouched.
pub fn route_text(
    table: &Table,
    profiles: Vec<ColumnProfile>,
    routing: &TextRouting,
    cardinality_threshold: usize,
) -> Result<Vec<ColumnProfile>> {
    routing.validate()?;

    let mut routed: Vec<ColumnProfile> = profiles
        .into_iter()
        .map(|p| {
            if p.kind == ColumnKind::Text && p.mean_words < routing.min_words {
                debug!(
                    column = %p.name,
                    mean_words = p.mean_words,
                    min_words = routing.min_words,
                    "too few words per entry, encoding as categorical"
                );
                p.demoted(cardinality_threshold)
            } else {
                p
            }
        })
        .collect();

    let text_columns: Vec<&str> = routed
        .iter()
        .filter(|p| p.kind == ColumnKind::Text)
        .map(|p| p.name.as_str())
        .collect();
    if text_columns.is_empty() {
        return Ok(routed);
    }

    let abundance = text_abundance(table, &text_columns);
    if abundance < routing.confidence {
        debug!(
            abundance,
            confidence = routing.confidence,
            "not enough rows with text, encoding text columns as categorical"
        );
        routed = routed
            .into_iter()
            .map(|p| {
                if p.kind == ColumnKind::Text {
                    p.demoted(cardinality_threshold)
                } else {
                    p
                }
            })
            .collect();
    } else {
        debug!(columns = ?text_columns, abundance, "routing columns to the sentence encoder");
    }

    Ok(routed)
}

/// Fraction of rows where at least one of `columns` holds a worded string
fn text_abundance(table: &Table, columns: &[&str]) -> f32 {
    let n_rows = table.n_rows();
    if n_rows == 0 {
        return 0.0;
    }
    let cols: Vec<_> = columns.iter().filter_map(|c| table.column(c)).collect();
    let with_text = (0..n_rows)
        .filter(|&i| cols.iter().any(|c| word_count(&c.values[i]) > 0))
        .count();
    with_text as f32 / n_rows as f32
}
