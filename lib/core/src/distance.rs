// Distance kernels over matrix rows
// Scalar code with two accumulators so the loop pipelines well without intrinsics

use crate::Matrix;
use rayon::prelude::*;

/// Squared Euclidean distance
#[inline]
pub fn l2_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }

    let mut sum0 = 0.0f32;
    let mut sum1 = 0.0f32;

    let chunks = a.chunks_exact(4);
    let remainder = chunks.remainder();
    let b_chunks = b.chunks_exact(4);

    for (a_chunk, b_chunk) in chunks.zip(b_chunks) {
        let d0 = a_chunk[0] - b_chunk[0];
        let d1 = a_chunk[1] - b_chunk[1];
        let d2 = a_chunk[2] - b_chunk[2];
        let d3 = a_chunk[3] - b_chunk[3];

        sum0 += d0 * d0 + d1 * d1;
        sum1 += d2 * d2 + d3 * d3;
    }

    for i in (a.len() - remainder.len())..a.len() {
        let diff = a[i] - b[i];
        sum0 += diff * diff;
    }

    sum0 + sum1
}

/// Euclidean distance
#[inline]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    l2_distance_squared(a, b).sqrt()
}

/// Full pairwise distance matrix between the rows of `m`, row-major `n * n`
///
/// Rows are computed in parallel; each entry depends only on its two rows, so
/// the result is identical to a sequential pass.
pub fn pairwise_distances(m: &Matrix) -> Vec<f32> {
    let n = m.n_rows();
    let mut out = vec![0.0f32; n * n];
    if n == 0 {
        return out;
    }
    out.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
        let a = m.row(i);
        for (j, slot) in row.iter_mut().enumerate() {
            if i != j {
                *slot = l2_distance(a, m.row(j));
            }
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_distance() {
        assert!((l2_distance(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-6);
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [0.0, 0.0, 0.0, 0.0, 0.0];
        assert!((l2_distance_squared(&a, &b) - 55.0).abs() < 1e-4);
        assert_eq!(l2_distance(&[1.0], &[1.0, 2.0]), f32::INFINITY);
    }

    #[test]
    fn test_pairwise_symmetric() {
        let m = Matrix::new(
            3,
            vec!["x".to_string(), "y".to_string()],
            vec![0.0, 0.0, 3.0, 4.0, 6.0, 8.0],
        )
        .unwrap();
        let d = pairwise_distances(&m);
        assert_eq!(d.len(), 9);
        assert_eq!(d[0], 0.0);
        assert!((d[1] - 5.0).abs() < 1e-6);
        assert!((d[2] - 10.0).abs() < 1e-6);
        assert_eq!(d[1], d[3]);
    }
}
