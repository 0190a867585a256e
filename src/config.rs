use featgraph_core::Result;
use featgraph_embed::UmapConfig;
use featgraph_features::EncodeConfig;
use serde::{Deserialize, Serialize};

/// Combined featurization and embedding settings
///
/// ```rust
/// use featgraph::Config;
///
/// let config = Config::from_json_str(r#"{
///     "featurize": { "use_scaler": "robust", "cardinality_threshold": 4 },
///     "umap": { "n_components": 3 }
/// }"#).unwrap();
/// assert_eq!(config.featurize.cardinality_threshold, 4);
/// assert_eq!(config.umap.n_neighbors, 15);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub featurize: EncodeConfig,

    #[serde(default)]
    pub umap: UmapConfig,
}

impl Config {
    /// Parse and validate a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.featurize.validate()?;
        config.umap.validate()?;
        Ok(config)
    }
}
