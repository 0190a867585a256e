//! Sigma-based edge pruning

use crate::adjacency::WeightedEdges;
use featgraph_core::{Error, Result};

/// Population mean and standard deviation of the edge weights
pub fn weight_stats(edges: &WeightedEdges) -> (f64, f64) {
    if edges.is_empty() {
        return (0.0, 0.0);
    }
    let n = edges.len() as f64;
    let mean = edges.iter().map(|e| e.weight as f64).sum::<f64>() / n;
    let var = edges
        .iter()
        .map(|e| {
            let d = e.weight as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, var.sqrt())
}

/// Keep edges with `weight >= mean - scale * std`.
///
/// A larger `scale` lowers the threshold, so the kept set only grows with
/// `scale`.
pub fn filter_edges(edges: &WeightedEdges, scale: f32) -> Result<WeightedEdges> {
    if !scale.is_finite() || scale < 0.0 {
        return Err(Error::config(format!(
            "filter scale must be a finite non-negative number, got {scale}"
        )));
    }
    let (mean, std) = weight_stats(edges);
    let threshold = mean - scale as f64 * std;
    let kept: WeightedEdges = edges
        .iter()
        .filter(|e| e.weight as f64 >= threshold)
        .copied()
        .collect();

    tracing::debug!(
        scale,
        threshold,
        before = edges.len(),
        after = kept.len(),
        "filtered weighted edges"
    );
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::WeightedEdge;

    fn edges(weights: &[f32]) -> WeightedEdges {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| WeightedEdge { src: i, dst: i + 1, weight: w })
            .collect()
    }

    #[test]
    fn test_zero_scale_keeps_above_mean() {
        let e = edges(&[0.1, 0.2, 0.3, 0.4]);
        let kept = filter_edges(&e, 0.0).unwrap();
        assert_eq!(kept.weights(), vec![0.3, 0.4]);
    }

    #[test]
    fn test_monotonic_in_scale() {
        let e = edges(&[0.05, 0.1, 0.2, 0.4, 0.8, 0.9, 0.95, 0.99]);
        let mut last = 0;
        for k in 0..8 {
            let scale = 6.0 * k as f32 / 7.0;
            let kept = filter_edges(&e, scale).unwrap().len();
            assert!(kept >= last, "scale {scale} kept {kept} < {last}");
            last = kept;
        }
        assert_eq!(last, e.len());
    }

    #[test]
    fn test_uniform_weights_kept() {
        let e = edges(&[0.5; 5]);
        assert_eq!(filter_edges(&e, 0.0).unwrap().len(), 5);
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(filter_edges(&WeightedEdges::default(), 1.0).unwrap().is_empty());
        assert!(matches!(filter_edges(&edges(&[0.5]), -1.0), Err(Error::Configuration(_))));
        assert!(filter_edges(&edges(&[0.5]), f32::NAN).is_err());
    }
}
