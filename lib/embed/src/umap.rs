//! UMAP-style manifold embedding
//!
//! Exact kNN graph, smooth-kNN memberships, fuzzy union, then seeded
//! stochastic gradient descent with negative sampling. The fitted
//! [`UmapModel`] keeps the training features so new rows can be placed
//! without refitting.

use crate::config::UmapConfig;
use crate::knn::{exact_knn, membership, query_knn, smooth_knn};
use featgraph_core::{Error, Matrix, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const INIT_RANGE: f32 = 10.0;
const GRADIENT_CLIP: f32 = 4.0;
const REPULSION_STRENGTH: f32 = 1.0;
const CURVE_POINTS: usize = 300;
const CURVE_ROUNDS: usize = 6;
const CURVE_STEPS: usize = 40;

/// A fitted embedding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UmapModel {
    config: UmapConfig,
    training: Matrix,
    embedding: Matrix,
    a: f32,
    b: f32,
}

impl UmapModel {
    /// Fit on `features` and return the model; the training embedding is
    /// available through [`UmapModel::embedding`]
    pub fn fit(features: &Matrix, config: &UmapConfig) -> Result<Self> {
        config.validate()?;
        if features.n_rows() == 0 || features.n_cols() == 0 {
            return Err(Error::featurization("cannot embed an empty feature matrix"));
        }
        if !features.is_finite() {
            return Err(Error::featurization("feature matrix contains non-finite values"));
        }

        let (a, b) = find_ab_params(config.spread, config.min_dist);
        let graph = fuzzy_graph(features, config.n_neighbors);
        let coords = optimize_layout(features.n_rows(), &graph, a, b, config);
        let embedding = Matrix::new(features.n_rows(), component_names(config.n_components), coords)?;

        tracing::info!(
            rows = features.n_rows(),
            features = features.n_cols(),
            edges = graph.len(),
            n_components = config.n_components,
            "umap fitted"
        );

        Ok(Self {
            config: config.clone(),
            training: features.clone(),
            embedding,
            a,
            b,
        })
    }

    pub fn config(&self) -> &UmapConfig {
        &self.config
    }

    pub fn embedding(&self) -> &Matrix {
        &self.embedding
    }

    pub fn training_features(&self) -> &Matrix {
        &self.training
    }

    /// Fitted curve parameters of the low-dimensional similarity
    pub fn curve(&self) -> (f32, f32) {
        (self.a, self.b)
    }

    /// Place new rows at the membership-weighted mean of the embeddings of
    /// their nearest training rows
    pub fn transform(&self, features: &Matrix) -> Result<Matrix> {
        if features.n_cols() != self.training.n_cols() {
            return Err(Error::Dimension {
                expected: self.training.n_cols(),
                actual: features.n_cols(),
            });
        }
        let dim = self.config.n_components;
        let neighbors = query_knn(&self.training, features, self.config.n_neighbors);
        let mut data = Vec::with_capacity(features.n_rows() * dim);

        for (indices, distances) in neighbors.indices.iter().zip(&neighbors.distances) {
            let (rho, sigma) = smooth_knn(distances);
            let mut weights: Vec<f32> = distances.iter().map(|d| membership(*d, rho, sigma)).collect();
            let total: f32 = weights.iter().sum();
            if total > 0.0 {
                weights.iter_mut().for_each(|w| *w /= total);
            } else {
                let uniform = 1.0 / weights.len().max(1) as f32;
                weights.iter_mut().for_each(|w| *w = uniform);
            }

            let mut point = vec![0.0f32; dim];
            for (&j, w) in indices.iter().zip(&weights) {
                for (p, e) in point.iter_mut().zip(self.embedding.row(j)) {
                    *p += w * e;
                }
            }
            data.extend(point);
        }

        Matrix::new(features.n_rows(), component_names(dim), data)
    }
}

/// Fit a fresh model, or reuse `previous` to place the rows without refitting
pub fn embed(
    features: Option<&Matrix>,
    previous: Option<&UmapModel>,
    config: &UmapConfig,
) -> Result<(Matrix, UmapModel)> {
    let features = match features {
        Some(f) if f.n_rows() > 0 && f.n_cols() > 0 => f,
        _ => {
            return Err(Error::featurization(
                "no features available to embed, featurize first",
            ))
        }
    };

    match previous {
        Some(model) => {
            tracing::debug!(rows = features.n_rows(), "reusing fitted umap model");
            Ok((model.transform(features)?, model.clone()))
        }
        None => {
            let model = UmapModel::fit(features, config)?;
            Ok((model.embedding().clone(), model))
        }
    }
}

/// Column names of an embedding: `x`, `y`, `z`, then `dim3`, `dim4`, ...
pub fn component_names(n_components: usize) -> Vec<String> {
    (0..n_components)
        .map(|k| match k {
            0 => "x".to_string(),
            1 => "y".to_string(),
            2 => "z".to_string(),
            _ => format!("dim{k}"),
        })
        .collect()
}

/// Symmetric membership graph as sorted `(i, j, weight)` with `i < j`
fn fuzzy_graph(features: &Matrix, n_neighbors: usize) -> Vec<(usize, usize, f32)> {
    let neighbors = exact_knn(features, n_neighbors);
    let mut directed: BTreeMap<(usize, usize), f32> = BTreeMap::new();

    for (i, (indices, distances)) in neighbors.indices.iter().zip(&neighbors.distances).enumerate() {
        let (rho, sigma) = smooth_knn(distances);
        for (&j, &d) in indices.iter().zip(distances) {
            directed.insert((i, j), membership(d, rho, sigma));
        }
    }

    let mut undirected: BTreeMap<(usize, usize), f32> = BTreeMap::new();
    for (&(i, j), &w) in &directed {
        let key = (i.min(j), i.max(j));
        if undirected.contains_key(&key) {
            continue;
        }
        let back = directed.get(&(j, i)).copied().unwrap_or(0.0);
        // fuzzy set union
        let union = w + back - w * back;
        if union > 0.0 {
            undirected.insert(key, union);
        }
    }

    undirected.into_iter().map(|((i, j), w)| (i, j, w)).collect()
}

fn optimize_layout(n: usize, graph: &[(usize, usize, f32)], a: f32, b: f32, config: &UmapConfig) -> Vec<f32> {
    let dim = config.n_components;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut emb: Vec<f32> = (0..n * dim)
        .map(|_| rng.random_range(-INIT_RANGE..INIT_RANGE))
        .collect();
    if graph.is_empty() || n < 2 {
        return emb;
    }

    let n_epochs = config.n_epochs as f32;
    let max_weight = graph.iter().map(|e| e.2).fold(0.0f32, f32::max);
    // each undirected edge is sampled in both directions
    let edges: Vec<(usize, usize, f32)> = graph
        .iter()
        .filter(|e| e.2 >= max_weight / n_epochs)
        .flat_map(|&(i, j, w)| [(i, j, max_weight / w), (j, i, max_weight / w)])
        .collect();

    let neg_rate = config.negative_sample_rate.max(1) as f32;
    let mut next_sample: Vec<f32> = edges.iter().map(|e| e.2).collect();
    let mut next_negative: Vec<f32> = edges.iter().map(|e| e.2 / neg_rate).collect();

    for epoch in 0..config.n_epochs {
        let epoch_f = epoch as f32;
        let alpha = config.learning_rate * (1.0 - epoch_f / n_epochs);

        for (e, &(head, tail, per_sample)) in edges.iter().enumerate() {
            if next_sample[e] > epoch_f {
                continue;
            }

            let dist_sq = squared_gap(&emb, head, tail, dim);
            if dist_sq > 0.0 {
                let coeff = -2.0 * a * b * dist_sq.powf(b - 1.0) / (a * dist_sq.powf(b) + 1.0);
                for d in 0..dim {
                    let delta = emb[head * dim + d] - emb[tail * dim + d];
                    let grad = clip(coeff * delta) * alpha;
                    emb[head * dim + d] += grad;
                    emb[tail * dim + d] -= grad;
                }
            }
            next_sample[e] += per_sample;

            let per_negative = per_sample / neg_rate;
            let n_neg = ((epoch_f - next_negative[e]) / per_negative).floor().max(0.0) as usize;
            for _ in 0..n_neg {
                let other = rng.random_range(0..n);
                if other == head {
                    continue;
                }
                let dist_sq = squared_gap(&emb, head, other, dim);
                let coeff = if dist_sq > 0.0 {
                    2.0 * REPULSION_STRENGTH * b / ((0.001 + dist_sq) * (a * dist_sq.powf(b) + 1.0))
                } else {
                    0.0
                };
                for d in 0..dim {
                    let grad = if coeff > 0.0 {
                        clip(coeff * (emb[head * dim + d] - emb[other * dim + d]))
                    } else {
                        GRADIENT_CLIP
                    };
                    emb[head * dim + d] += grad * alpha;
                }
            }
            next_negative[e] += n_neg as f32 * per_negative;
        }
    }

    emb
}

#[inline]
fn squared_gap(emb: &[f32], i: usize, j: usize, dim: usize) -> f32 {
    emb[i * dim..(i + 1) * dim]
        .iter()
        .zip(&emb[j * dim..(j + 1) * dim])
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

#[inline]
fn clip(v: f32) -> f32 {
    v.clamp(-GRADIENT_CLIP, GRADIENT_CLIP)
}

/// Fit `1 / (1 + a * x^(2b))` to the offset exponential implied by
/// `spread` and `min_dist` with a shrinking grid search
pub fn find_ab_params(spread: f32, min_dist: f32) -> (f32, f32) {
    let spread = spread as f64;
    let min_dist = min_dist as f64;
    let xs: Vec<f64> = (0..CURVE_POINTS)
        .map(|i| 3.0 * spread * i as f64 / (CURVE_POINTS - 1) as f64)
        .collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|&x| if x < min_dist { 1.0 } else { (-(x - min_dist) / spread).exp() })
        .collect();
    let loss = |a: f64, b: f64| -> f64 {
        xs.iter()
            .zip(&ys)
            .map(|(&x, &y)| {
                let f = 1.0 / (1.0 + a * x.powf(2.0 * b));
                (f - y) * (f - y)
            })
            .sum()
    };

    let (mut a_lo, mut a_hi, mut b_lo, mut b_hi) = (0.001f64, 10.0f64, 0.1f64, 3.0f64);
    let mut best = (1.0f64, 1.0f64, f64::INFINITY);
    for _ in 0..CURVE_ROUNDS {
        let a_step = (a_hi - a_lo) / CURVE_STEPS as f64;
        let b_step = (b_hi - b_lo) / CURVE_STEPS as f64;
        for i in 0..=CURVE_STEPS {
            for j in 0..=CURVE_STEPS {
                let a = a_lo + a_step * i as f64;
                let b = b_lo + b_step * j as f64;
                let l = loss(a, b);
                if l < best.2 {
                    best = (a, b, l);
                }
            }
        }
        a_lo = (best.0 - 2.0 * a_step).max(1e-4);
        a_hi = best.0 + 2.0 * a_step;
        b_lo = (best.1 - 2.0 * b_step).max(1e-3);
        b_hi = best.1 + 2.0 * b_step;
    }

    (best.0 as f32, best.1 as f32)
}
