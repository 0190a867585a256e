//! Exact k-nearest neighbours and smooth-kNN calibration

use featgraph_core::distance::l2_distance;
use featgraph_core::Matrix;
use ordered_float::OrderedFloat;
use rayon::prelude::*;

/// Binary search iterations when calibrating sigma
const SMOOTH_K_ITERATIONS: usize = 64;
const SMOOTH_K_TOLERANCE: f32 = 1e-5;
/// Lower bound for sigma, relative to the mean neighbour distance
const MIN_K_DIST_SCALE: f32 = 1e-3;

/// Neighbour lists, nearest first
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbors {
    pub indices: Vec<Vec<usize>>,
    pub distances: Vec<Vec<f32>>,
}

/// `k` nearest rows of `data` for every row of `data`, excluding the row itself
pub fn exact_knn(data: &Matrix, k: usize) -> Neighbors {
    let n = data.n_rows();
    let k = k.min(n.saturating_sub(1));
    let (indices, distances) = (0..n)
        .into_par_iter()
        .map(|i| nearest(data, data.row(i), k, Some(i)))
        .unzip();
    Neighbors { indices, distances }
}

/// `k` nearest rows of `reference` for every row of `queries`
pub fn query_knn(reference: &Matrix, queries: &Matrix, k: usize) -> Neighbors {
    let k = k.min(reference.n_rows());
    let (indices, distances) = (0..queries.n_rows())
        .into_par_iter()
        .map(|i| nearest(reference, queries.row(i), k, None))
        .unzip();
    Neighbors { indices, distances }
}

fn nearest(reference: &Matrix, query: &[f32], k: usize, skip: Option<usize>) -> (Vec<usize>, Vec<f32>) {
    let mut candidates: Vec<(OrderedFloat<f32>, usize)> = (0..reference.n_rows())
        .filter(|&j| Some(j) != skip)
        .map(|j| (OrderedFloat(l2_distance(query, reference.row(j))), j))
        .collect();
    // ties broken by index keeps the result independent of thread scheduling
    candidates.sort_unstable();
    candidates.truncate(k);
    candidates.into_iter().map(|(d, j)| (j, d.0)).unzip()
}

/// Per-row `rho` (distance to the closest distinct neighbour) and `sigma`
/// such that the memberships of a row sum to `log2(k)`
pub fn smooth_knn(distances: &[f32]) -> (f32, f32) {
    if distances.is_empty() {
        return (0.0, 1.0);
    }
    let target = (distances.len() as f32).log2().max(f32::EPSILON);
    let rho = distances.iter().copied().find(|d| *d > 0.0).unwrap_or(0.0);

    let mut lo = 0.0f32;
    let mut hi = f32::INFINITY;
    let mut mid = 1.0f32;
    for _ in 0..SMOOTH_K_ITERATIONS {
        let psum: f32 = distances
            .iter()
            .map(|d| (-(d - rho).max(0.0) / mid).exp())
            .sum();
        if (psum - target).abs() < SMOOTH_K_TOLERANCE {
            break;
        }
        if psum > target {
            hi = mid;
            mid = (lo + hi) / 2.0;
        } else {
            lo = mid;
            mid = if hi.is_infinite() { mid * 2.0 } else { (lo + hi) / 2.0 };
        }
    }

    let mean = distances.iter().sum::<f32>() / distances.len() as f32;
    let sigma = mid.max(MIN_K_DIST_SCALE * mean).max(f32::EPSILON);
    (rho, sigma)
}

/// Membership strength of a neighbour at distance `d`
#[inline]
pub fn membership(d: f32, rho: f32, sigma: f32) -> f32 {
    (-(d - rho).max(0.0) / sigma).exp()
}
