//! Multi-label binarization
//!
//! Each row carries a set of labels (elements of a list-valued cell, or the
//! two endpoints of an edge). The fitted label universe is the sorted union
//! of everything seen at fit time; at transform time unseen labels are
//! dropped, never an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultiLabelBinarizer {
    classes: Vec<String>,
}

impl MultiLabelBinarizer {
    pub fn fit(rows: &[Vec<String>]) -> Self {
        let classes: BTreeSet<&String> = rows.iter().flatten().collect();
        Self {
            classes: classes.into_iter().cloned().collect(),
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn width(&self) -> usize {
        self.classes.len()
    }

    /// Feature names `<prefix>_<label>`
    pub fn feature_names(&self, prefix: &str) -> Vec<String> {
        self.classes
            .iter()
            .map(|c| format!("{}_{}", prefix, c))
            .collect()
    }

    /// Encode one row's labels into 0/1 indicators, returning how many
    /// labels were unknown
    pub fn encode_into(&self, labels: &[String], out: &mut Vec<f32>) -> usize {
        let start = out.len();
        out.resize(start + self.classes.len(), 0.0);
        let mut unknown = 0;
        for label in labels {
            match self.classes.binary_search(label) {
                Ok(idx) => out[start + idx] = 1.0,
                Err(_) => unknown += 1,
            }
        }
        unknown
    }

    /// Encode all rows into a row-major block
    pub fn transform(&self, rows: &[Vec<String>]) -> Vec<f32> {
        let mut out = Vec::with_capacity(rows.len() * self.classes.len());
        let dropped: usize = rows.iter().map(|r| self.encode_into(r, &mut out)).sum();
        if dropped > 0 {
            debug!(dropped, "multi-label binarizer ignored labels unseen at fit time");
        }
        out
    }
}
