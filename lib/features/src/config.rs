//! Encoding configuration
//!
//! Every threshold and model identifier used by featurization is an explicit
//! field here; nothing is read from process-wide state.

use crate::scaler::ScalerKind;
use crate::text::DEFAULT_MODEL_NAME;
use featgraph_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the dirty-table pipelines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncodeConfig {
    /// Scaler for numeric and date-part columns
    #[serde(default)]
    pub use_scaler: ScalerKind,

    /// Distinct-value count above which a feature column is high-cardinality
    #[serde(default = "default_cardinality_threshold")]
    pub cardinality_threshold: usize,

    /// Same threshold, for target columns
    #[serde(default = "default_cardinality_threshold_target")]
    pub cardinality_threshold_target: usize,

    /// Width of the high-cardinality (min-hash) encoding
    #[serde(default = "default_n_topics")]
    pub n_topics: usize,

    /// Minimum fraction of rows with real text for text encoding to kick in
    #[serde(default = "default_confidence")]
    pub confidence: f32,

    /// Minimum mean words per cell for a column to count as text
    #[serde(default = "default_min_words")]
    pub min_words: f32,

    /// Sentence encoder used for text columns
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

fn default_cardinality_threshold() -> usize {
    40
}

fn default_cardinality_threshold_target() -> usize {
    400
}

fn default_n_topics() -> usize {
    42
}

fn default_confidence() -> f32 {
    0.35
}

fn default_min_words() -> f32 {
    2.5
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            use_scaler: ScalerKind::default(),
            cardinality_threshold: default_cardinality_threshold(),
            cardinality_threshold_target: default_cardinality_threshold_target(),
            n_topics: default_n_topics(),
            confidence: default_confidence(),
            min_words: default_min_words(),
            model_name: default_model_name(),
        }
    }
}

impl EncodeConfig {
    pub fn with_scaler(mut self, scaler: ScalerKind) -> Self {
        self.use_scaler = scaler;
        self
    }

    pub fn with_cardinality_threshold(mut self, threshold: usize) -> Self {
        self.cardinality_threshold = threshold;
        self
    }

    pub fn with_cardinality_threshold_target(mut self, threshold: usize) -> Self {
        self.cardinality_threshold_target = threshold;
        self
    }

    pub fn with_n_topics(mut self, n_topics: usize) -> Self {
        self.n_topics = n_topics;
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_min_words(mut self, min_words: f32) -> Self {
        self.min_words = min_words;
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Check the numeric knobs; text-specific checks happen in the router
    pub fn validate(&self) -> Result<()> {
        if self.cardinality_threshold == 0 {
            return Err(Error::config("cardinality_threshold must be a positive integer, got 0"));
        }
        if self.cardinality_threshold_target == 0 {
            return Err(Error::config(
                "cardinality_threshold_target must be a positive integer, got 0",
            ));
        }
        if self.n_topics == 0 {
            return Err(Error::config("n_topics must be a positive integer, got 0"));
        }
        Ok(())
    }
}
