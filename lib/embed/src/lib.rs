//! # featgraph Embed
//!
//! Dimensionality reduction and graphs derived from embeddings.
//!
//! - [`umap`]: UMAP-style reduction of a feature matrix to a few dimensions,
//!   reusable on new rows through the fitted [`UmapModel`].
//! - [`adjacency`]: dense weighted adjacency and edge list over the
//!   embedded rows.
//! - [`filter`]: drops weak edges with a `mean - scale * std` threshold.
//!
//! ```rust
//! use featgraph_core::Matrix;
//! use featgraph_embed::{build_weighted_graph, embed, filter_edges, UmapConfig};
//!
//! let features = Matrix::from_rows(
//!     vec!["a".into(), "b".into()],
//!     &[vec![0.0, 0.0], vec![0.1, 0.0], vec![5.0, 5.0], vec![5.1, 5.0]],
//! ).unwrap();
//!
//! let config = UmapConfig::default().with_n_neighbors(2).with_n_epochs(50);
//! let (embedding, _model) = embed(Some(&features), None, &config).unwrap();
//! let (_adjacency, edges) = build_weighted_graph(&embedding).unwrap();
//! let strong = filter_edges(&edges, 0.0).unwrap();
//! assert!(strong.len() <= edges.len());
//! ```

pub mod adjacency;
pub mod config;
pub mod filter;
pub mod knn;
pub mod umap;

pub use adjacency::{
    build_weighted_graph, WeightedAdjacency, WeightedEdge, WeightedEdges, DST_COLUMN, SRC_COLUMN,
    WEIGHT_COLUMN,
};
pub use config::UmapConfig;
pub use filter::{filter_edges, weight_stats};
pub use umap::{embed, UmapModel};
