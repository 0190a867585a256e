//! UMAP configuration

use featgraph_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Knobs for the embedding engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UmapConfig {
    /// Embedding dimensions
    #[serde(default = "default_n_components")]
    pub n_components: usize,

    /// Size of the local neighbourhood
    #[serde(default = "default_n_neighbors")]
    pub n_neighbors: usize,

    /// Minimum distance between embedded points
    #[serde(default = "default_min_dist")]
    pub min_dist: f32,

    #[serde(default = "default_spread")]
    pub spread: f32,

    #[serde(default = "default_n_epochs")]
    pub n_epochs: usize,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f32,

    /// Negative samples per positive sample
    #[serde(default = "default_negative_sample_rate")]
    pub negative_sample_rate: usize,

    /// Seed for initialisation and sampling
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_n_components() -> usize {
    2
}

fn default_n_neighbors() -> usize {
    15
}

fn default_min_dist() -> f32 {
    0.1
}

fn default_spread() -> f32 {
    1.0
}

fn default_n_epochs() -> usize {
    200
}

fn default_learning_rate() -> f32 {
    1.0
}

fn default_negative_sample_rate() -> usize {
    5
}

fn default_seed() -> u64 {
    42
}

impl Default for UmapConfig {
    fn default() -> Self {
        Self {
            n_components: default_n_components(),
            n_neighbors: default_n_neighbors(),
            min_dist: default_min_dist(),
            spread: default_spread(),
            n_epochs: default_n_epochs(),
            learning_rate: default_learning_rate(),
            negative_sample_rate: default_negative_sample_rate(),
            seed: default_seed(),
        }
    }
}

impl UmapConfig {
    pub fn with_n_components(mut self, n: usize) -> Self {
        self.n_components = n;
        self
    }

    pub fn with_n_neighbors(mut self, n: usize) -> Self {
        self.n_neighbors = n;
        self
    }

    pub fn with_min_dist(mut self, min_dist: f32) -> Self {
        self.min_dist = min_dist;
        self
    }

    pub fn with_n_epochs(mut self, n_epochs: usize) -> Self {
        self.n_epochs = n_epochs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_components == 0 {
            return Err(Error::config("n_components must be at least 1"));
        }
        if self.n_neighbors == 0 {
            return Err(Error::config("n_neighbors must be at least 1"));
        }
        if self.n_epochs == 0 {
            return Err(Error::config("n_epochs must be at least 1"));
        }
        if !(self.spread.is_finite() && self.spread > 0.0) {
            return Err(Error::config(format!("spread must be positive, got {}", self.spread)));
        }
        if !(self.min_dist.is_finite() && self.min_dist >= 0.0 && self.min_dist <= self.spread) {
            return Err(Error::config(format!(
                "min_dist must lie in [0, spread = {}], got {}",
                self.spread, self.min_dist
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: UmapConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, UmapConfig::default());
        assert_eq!(config.n_components, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid() {
        assert!(UmapConfig::default().with_n_components(0).validate().is_err());
        assert!(UmapConfig::default().with_min_dist(2.0).validate().is_err());
    }
}
