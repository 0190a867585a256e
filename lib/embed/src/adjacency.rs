//! Weighted graphs built from an embedding
//!
//! Every unordered pair of rows becomes an edge whose weight decays with
//! their embedded distance: `exp(-d² / (2h²))`, with the bandwidth `h` set
//! to the median positive pairwise distance.

use featgraph_core::distance::pairwise_distances;
use featgraph_core::{Column, Error, Matrix, Result, Table};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SRC_COLUMN: &str = "_src_implicit";
pub const DST_COLUMN: &str = "_dst_implicit";
pub const WEIGHT_COLUMN: &str = "_weight";

/// Dense symmetric `n * n` weight matrix, zero diagonal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightedAdjacency {
    n: usize,
    weights: Vec<f32>,
}

impl WeightedAdjacency {
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.weights[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.weights[i * self.n..(i + 1) * self.n]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeightedEdge {
    pub src: usize,
    pub dst: usize,
    pub weight: f32,
}

/// Edge list over row indices, `src < dst`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeightedEdges {
    edges: Vec<WeightedEdge>,
}

impl WeightedEdges {
    pub fn new(edges: Vec<WeightedEdge>) -> Self {
        Self { edges }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedEdge> {
        self.edges.iter()
    }

    pub fn as_slice(&self) -> &[WeightedEdge] {
        &self.edges
    }

    pub fn weights(&self) -> Vec<f32> {
        self.edges.iter().map(|e| e.weight).collect()
    }

    /// Three-column table `_src_implicit`, `_dst_implicit`, `_weight`.
    ///
    /// With `labels`, endpoints are written as the label of the row instead
    /// of its index.
    pub fn to_table(&self, labels: Option<&Column>) -> Result<Table> {
        let endpoint = |i: usize| -> Result<Value> {
            match labels {
                Some(col) => col.values.get(i).cloned().ok_or_else(|| {
                    Error::shape(format!("label column '{}' is shorter than the edge endpoints", col.name), i + 1, col.len())
                }),
                None => Ok(Value::from(i)),
            }
        };

        let mut src = Vec::with_capacity(self.len());
        let mut dst = Vec::with_capacity(self.len());
        let mut weight = Vec::with_capacity(self.len());
        for edge in &self.edges {
            src.push(endpoint(edge.src)?);
            dst.push(endpoint(edge.dst)?);
            weight.push(Value::from(edge.weight as f64));
        }

        Table::from_columns(vec![
            Column::new(SRC_COLUMN, src),
            Column::new(DST_COLUMN, dst),
            Column::new(WEIGHT_COLUMN, weight),
        ])
    }
}

impl FromIterator<WeightedEdge> for WeightedEdges {
    fn from_iter<I: IntoIterator<Item = WeightedEdge>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Build the dense adjacency and its edge list from an embedding
///
/// Every pair of rows is connected, so both outputs grow quadratically: an
/// `n`-row embedding yields `n * n` adjacency cells and `n * (n - 1) / 2`
/// edges. At 10k rows that is about 5e7 edges; filter or subsample before
/// embedding tables of that size.
pub fn build_weighted_graph(embedding: &Matrix) -> Result<(WeightedAdjacency, WeightedEdges)> {
    let n = embedding.n_rows();
    if n == 0 {
        return Err(Error::featurization("cannot build a graph from an empty embedding"));
    }

    let distances = pairwise_distances(embedding);
    let h = bandwidth(&distances, n);
    let denom = 2.0 * h * h;

    let mut weights = vec![0.0f32; n * n];
    let mut edges = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = distances[i * n + j];
            let w = (-(d * d) / denom).exp();
            weights[i * n + j] = w;
            weights[j * n + i] = w;
            edges.push(WeightedEdge { src: i, dst: j, weight: w });
        }
    }

    tracing::debug!(nodes = n, edges = edges.len(), bandwidth = h, "weighted graph built");

    Ok((WeightedAdjacency { n, weights }, WeightedEdges::new(edges)))
}

/// Median positive pairwise distance, 1 when every pair coincides
fn bandwidth(distances: &[f32], n: usize) -> f32 {
    let mut positive: Vec<OrderedFloat<f32>> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .map(|(i, j)| distances[i * n + j])
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(OrderedFloat)
        .collect();
    if positive.is_empty() {
        return 1.0;
    }
    positive.sort_unstable();
    positive[positive.len() / 2].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn points() -> Matrix {
        Matrix::from_rows(
            vec!["x".into(), "y".into()],
            &[vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![5.0, 5.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_adjacency_shape() {
        let (adj, edges) = build_weighted_graph(&points()).unwrap();
        assert_eq!(adj.n(), 4);
        assert!(adj.is_symmetric());
        assert!((0..4).all(|i| adj.get(i, i) == 0.0));
        assert_eq!(edges.len(), 6);
        assert!(edges.iter().all(|e| e.src < e.dst));
        assert!(edges.iter().all(|e| e.weight > 0.0 && e.weight <= 1.0));
    }

    #[test]
    fn test_weight_decreases_with_distance() {
        let (adj, _) = build_weighted_graph(&points()).unwrap();
        assert!(adj.get(0, 1) > adj.get(0, 3));
        assert_eq!(adj.get(0, 1), adj.get(0, 2));
    }

    #[test]
    fn test_coincident_points() {
        let m = Matrix::zeros(3, vec!["x".into()]);
        let (adj, edges) = build_weighted_graph(&m).unwrap();
        assert_eq!(edges.len(), 3);
        assert_eq!(adj.get(0, 1), 1.0);
    }

    #[test]
    fn test_single_and_empty() {
        let one = Matrix::zeros(1, vec!["x".into()]);
        let (adj, edges) = build_weighted_graph(&one).unwrap();
        assert_eq!(adj.n(), 1);
        assert!(edges.is_empty());
        assert!(build_weighted_graph(&Matrix::zeros(0, vec!["x".into()])).is_err());
    }

    #[test]
    fn test_to_table_with_labels() {
        let (_, edges) = build_weighted_graph(&points()).unwrap();
        let plain = edges.to_table(None).unwrap();
        assert_eq!(plain.column_names(), vec![SRC_COLUMN, DST_COLUMN, WEIGHT_COLUMN]);
        assert_eq!(plain.n_rows(), 6);
        assert_eq!(plain.column(SRC_COLUMN).unwrap().values[0], json!(0));

        let labels = Column::new("id", vec![json!("a"), json!("b"), json!("c"), json!("d")]);
        let named = edges.to_table(Some(&labels)).unwrap();
        assert_eq!(named.column(DST_COLUMN).unwrap().values[0], json!("b"));

        let short = Column::new("id", vec![json!("a")]);
        assert!(edges.to_table(Some(&short)).is_err());
    }
}
