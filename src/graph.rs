//! Graph value holding bound tables and everything derived from them
//!
//! Every operation takes `&self` and returns a new [`Graph`]; a failed call
//! leaves the original untouched.

use crate::featurize::{featurize_edges, featurize_nodes, EdgeEncoders, EdgeFeaturization, NodeFeaturization};
use crate::kind::Kind;
use featgraph_core::{Column, Error, Matrix, Result, Table};
use featgraph_embed::{
    build_weighted_graph, embed, filter_edges, UmapConfig, UmapModel, WeightedAdjacency, WeightedEdges,
    DST_COLUMN, SRC_COLUMN,
};
use featgraph_features::{DirtyVectorizer, EncodeConfig};

/// Embedding of one kind and the graph derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingResult {
    pub embedding: Matrix,
    pub adjacency: WeightedAdjacency,
    pub edges: WeightedEdges,
    /// `edges` as a `_src_implicit` / `_dst_implicit` / `_weight` table
    pub edges_table: Table,
    pub model: UmapModel,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Option<Table>,
    node_id: Option<String>,
    edges: Option<Table>,
    source: Option<String>,
    destination: Option<String>,
    node_featurization: Option<NodeFeaturization>,
    edge_featurization: Option<EdgeFeaturization>,
    node_embedding: Option<EmbeddingResult>,
    edge_embedding: Option<EmbeddingResult>,
    latest: Option<Kind>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a node table, optionally naming its id column.
    ///
    /// Drops any node-space results of a previously bound table.
    pub fn nodes(&self, table: Table, node_id: Option<&str>) -> Result<Graph> {
        if let Some(id) = node_id {
            if !table.has_column(id) {
                return Err(Error::config(format!("node id column '{id}' is not in the node table")));
            }
        }
        let mut g = self.clone();
        g.nodes = Some(table);
        g.node_id = node_id.map(str::to_string);
        g.clear(Kind::Nodes);
        Ok(g)
    }

    /// Bind an edge table with its endpoint columns.
    ///
    /// Drops any edge-space results of a previously bound table.
    pub fn edges(&self, table: Table, source: &str, destination: &str) -> Result<Graph> {
        for name in [source, destination] {
            if !table.has_column(name) {
                return Err(Error::config(format!("endpoint column '{name}' is not in the edge table")));
            }
        }
        let mut g = self.clone();
        g.edges = Some(table);
        g.source = Some(source.to_string());
        g.destination = Some(destination.to_string());
        g.clear(Kind::Edges);
        Ok(g)
    }

    fn clear(&mut self, kind: Kind) {
        match kind {
            Kind::Nodes => {
                self.node_featurization = None;
                self.node_embedding = None;
            }
            Kind::Edges => {
                self.edge_featurization = None;
                self.edge_embedding = None;
            }
        }
        if self.latest == Some(kind) {
            self.latest = None;
        }
    }

    fn table(&self, kind: Kind) -> Result<&Table> {
        let table = match kind {
            Kind::Nodes => self.nodes.as_ref(),
            Kind::Edges => self.edges.as_ref(),
        };
        table.ok_or_else(|| Error::config(format!("no {kind} table is bound")))
    }

    /// Fit encoders for `kind` and attach features, target and fitted state.
    ///
    /// Any earlier embedding of the same kind is dropped.
    pub fn featurize(
        &self,
        kind: Kind,
        y: Option<&Table>,
        use_columns: Option<&[&str]>,
        config: &EncodeConfig,
    ) -> Result<Graph> {
        let table = self.table(kind)?;
        let mut g = self.clone();
        match kind {
            Kind::Nodes => {
                let featurization = featurize_nodes(table, y, use_columns, config)?;
                g.clear(Kind::Nodes);
                g.node_featurization = Some(featurization);
            }
            Kind::Edges => {
                let (source, destination) = self.endpoints()?;
                let featurization = featurize_edges(table, source, destination, y, use_columns, config)?;
                g.clear(Kind::Edges);
                g.edge_featurization = Some(featurization);
            }
        }
        Ok(g)
    }

    /// Encode new rows with the state attached by [`Graph::featurize`]
    pub fn transform(&self, kind: Kind, table: &Table, y: Option<&Table>) -> Result<(Matrix, Option<Matrix>)> {
        let missing = || Error::featurization(format!("{kind} have not been featurized yet"));
        match kind {
            Kind::Nodes => self.node_featurization.as_ref().ok_or_else(missing)?.transform(table, y),
            Kind::Edges => self.edge_featurization.as_ref().ok_or_else(missing)?.transform(table, y),
        }
    }

    /// Featurize `kind` then embed it
    pub fn umap(
        &self,
        kind: Kind,
        y: Option<&Table>,
        use_columns: Option<&[&str]>,
        encode: &EncodeConfig,
        umap: &UmapConfig,
    ) -> Result<Graph> {
        self.featurize(kind, y, use_columns, encode)?.embed(kind, None, umap)
    }

    /// Embed the attached features of `kind`, reusing `previous` when given,
    /// and derive the weighted graph over the embedded rows
    ///
    /// The weighted graph is complete: memory for the adjacency and the edge
    /// table is quadratic in the row count (see [`build_weighted_graph`]).
    pub fn embed(&self, kind: Kind, previous: Option<&UmapModel>, config: &UmapConfig) -> Result<Graph> {
        let features = match kind {
            Kind::Nodes => self.node_featurization.as_ref().map(|f| &f.features),
            Kind::Edges => self.edge_featurization.as_ref().map(|f| &f.features),
        };
        let (embedding, model) = embed(features, previous, config)?;
        let (adjacency, edges) = build_weighted_graph(&embedding)?;
        let edges_table = edges.to_table(self.labels(kind))?;

        tracing::info!(
            %kind,
            rows = embedding.n_rows(),
            weighted_edges = edges.len(),
            "embedded"
        );

        let result = EmbeddingResult {
            embedding,
            adjacency,
            edges,
            edges_table,
            model,
        };
        let mut g = self.clone();
        match kind {
            Kind::Nodes => g.node_embedding = Some(result),
            Kind::Edges => g.edge_embedding = Some(result),
        }
        g.latest = Some(kind);
        Ok(g)
    }

    /// Keep the strong weighted edges of `kind` and bind them as the edge
    /// table of a new graph
    pub fn filter_edges(&self, kind: Kind, scale: f32) -> Result<Graph> {
        let result = self
            .embedding_result(kind)
            .ok_or_else(|| Error::featurization(format!("{kind} have no embedding to filter, run umap first")))?;
        let kept = filter_edges(&result.edges, scale)?;
        let table = kept.to_table(self.labels(kind))?;
        self.edges(table, SRC_COLUMN, DST_COLUMN)
    }

    // Node-space tables carry node ids when an id column is bound
    fn labels(&self, kind: Kind) -> Option<&Column> {
        match kind {
            Kind::Nodes => {
                let id = self.node_id.as_deref()?;
                self.nodes.as_ref()?.column(id)
            }
            Kind::Edges => None,
        }
    }

    fn endpoints(&self) -> Result<(&str, &str)> {
        match (self.source.as_deref(), self.destination.as_deref()) {
            (Some(s), Some(d)) => Ok((s, d)),
            _ => Err(Error::config("edge endpoints are not bound")),
        }
    }

    pub fn nodes_table(&self) -> Option<&Table> {
        self.nodes.as_ref()
    }

    pub fn edges_table(&self) -> Option<&Table> {
        self.edges.as_ref()
    }

    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn node_featurization(&self) -> Option<&NodeFeaturization> {
        self.node_featurization.as_ref()
    }

    pub fn edge_featurization(&self) -> Option<&EdgeFeaturization> {
        self.edge_featurization.as_ref()
    }

    pub fn node_features(&self) -> Option<&Matrix> {
        self.node_featurization.as_ref().map(|f| &f.features)
    }

    pub fn node_target(&self) -> Option<&Matrix> {
        self.node_featurization.as_ref()?.target.as_ref()
    }

    pub fn node_encoder(&self) -> Option<&DirtyVectorizer> {
        self.node_featurization.as_ref().map(|f| &f.encoder)
    }

    pub fn node_target_encoder(&self) -> Option<&DirtyVectorizer> {
        self.node_featurization.as_ref()?.target_encoder.as_ref()
    }

    pub fn edge_features(&self) -> Option<&Matrix> {
        self.edge_featurization.as_ref().map(|f| &f.features)
    }

    pub fn edge_target(&self) -> Option<&Matrix> {
        self.edge_featurization.as_ref()?.target.as_ref()
    }

    pub fn edge_encoders(&self) -> Option<&EdgeEncoders> {
        self.edge_featurization.as_ref().map(|f| &f.encoder)
    }

    pub fn edge_target_encoder(&self) -> Option<&DirtyVectorizer> {
        self.edge_featurization.as_ref()?.target_encoder.as_ref()
    }

    pub fn embedding_result(&self, kind: Kind) -> Option<&EmbeddingResult> {
        match kind {
            Kind::Nodes => self.node_embedding.as_ref(),
            Kind::Edges => self.edge_embedding.as_ref(),
        }
    }

    pub fn node_embedding(&self) -> Option<&Matrix> {
        self.node_embedding.as_ref().map(|r| &r.embedding)
    }

    pub fn weighted_adjacency_nodes(&self) -> Option<&WeightedAdjacency> {
        self.node_embedding.as_ref().map(|r| &r.adjacency)
    }

    pub fn weighted_edges_from_nodes(&self) -> Option<&Table> {
        self.node_embedding.as_ref().map(|r| &r.edges_table)
    }

    pub fn edge_embedding(&self) -> Option<&Matrix> {
        self.edge_embedding.as_ref().map(|r| &r.embedding)
    }

    pub fn weighted_adjacency_edges(&self) -> Option<&WeightedAdjacency> {
        self.edge_embedding.as_ref().map(|r| &r.adjacency)
    }

    pub fn weighted_edges_from_edges(&self) -> Option<&Table> {
        self.edge_embedding.as_ref().map(|r| &r.edges_table)
    }

    fn latest(&self) -> Option<&EmbeddingResult> {
        self.embedding_result(self.latest?)
    }

    /// Adjacency of the most recent embedding, whichever kind it was
    pub fn weighted_adjacency(&self) -> Option<&WeightedAdjacency> {
        self.latest().map(|r| &r.adjacency)
    }

    /// Weighted edge table of the most recent embedding
    pub fn weighted_edges(&self) -> Option<&Table> {
        self.latest().map(|r| &r.edges_table)
    }

    /// Model of the most recent embedding
    pub fn umap_model(&self) -> Option<&UmapModel> {
        self.latest().map(|r| &r.model)
    }
}
