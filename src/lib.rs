//! # featgraph
//!
//! Feature encoding and embedding for graph analytics: dirty node and edge
//! tables in, dense feature matrices, UMAP embeddings and weighted graphs out.
//!
//! ## Quick Start
//!
//! ```rust
//! use featgraph::prelude::*;
//! use serde_json::json;
//!
//! let nodes = Table::from_records(&[
//!     json!({"id": "a", "bio": "writes about graph layouts and tooling", "age": 31}),
//!     json!({"id": "b", "bio": "builds storage engines in the evening", "age": 45}),
//!     json!({"id": "c", "bio": "plays chess and reads about compilers", "age": 27}),
//!     json!({"id": "d", "bio": "maintains a small parser library", "age": 38}),
//! ]).unwrap();
//!
//! let umap = UmapConfig::default().with_n_neighbors(3).with_n_epochs(50);
//! let g = Graph::new()
//!     .nodes(nodes, Some("id")).unwrap()
//!     .umap(Kind::Nodes, None, Some(&["bio", "age"]), &EncodeConfig::default(), &umap)
//!     .unwrap();
//!
//! assert_eq!(g.node_embedding().unwrap().shape(), (4, 2));
//! let strong = g.filter_edges(Kind::Nodes, 0.5).unwrap();
//! assert!(strong.edges_table().unwrap().n_rows() <= 6);
//! ```
//!
//! ## Crate Structure
//!
//! - [`featgraph-core`](featgraph_core) - tables, cell probes, matrices, distances, errors
//! - [`featgraph-features`](featgraph_features) - column classifier, text router, dirty-table vectorizer
//! - [`featgraph-embed`](featgraph_embed) - UMAP engine, weighted graphs, edge filter
//!
//! This crate ties them together behind the immutable [`Graph`] value.

pub mod config;
pub mod featurize;
pub mod graph;
pub mod kind;

pub use config::Config;
pub use featurize::{
    featurize_edges, featurize_nodes, EdgeEncoders, EdgeFeaturization, Featurization, NodeFeaturization,
};
pub use graph::{EmbeddingResult, Graph};
pub use kind::Kind;

// Re-export core types
pub use featgraph_core::{Column, Error, Matrix, Result, Table};

// Re-export features
pub use featgraph_features::{
    ColumnKind, DirtyVectorizer, EncodeConfig, MultiLabelBinarizer, ScalerKind, DEFAULT_MODEL_NAME,
};

// Re-export embedding
pub use featgraph_embed::{
    build_weighted_graph, embed, filter_edges, UmapConfig, UmapModel, WeightedAdjacency, WeightedEdge,
    WeightedEdges,
};

pub mod prelude {
    pub use crate::{
        Column, Config, EdgeEncoders, EncodeConfig, Error, Graph, Kind, Matrix, Result, ScalerKind, Table,
        UmapConfig, UmapModel,
    };
}
