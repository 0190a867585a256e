use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Dense row-major matrix of `f32` with named columns
///
/// Feature matrices, targets and embeddings all use this type. Row `i`
/// always corresponds to row `i` of the table it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Matrix {
    columns: Vec<String>,
    n_rows: usize,
    data: Vec<f32>,
}

impl Matrix {
    pub fn new(n_rows: usize, columns: Vec<String>, data: Vec<f32>) -> Result<Self> {
        let expected = n_rows * columns.len();
        if data.len() != expected {
            return Err(Error::Dimension {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            columns,
            n_rows,
            data,
        })
    }

    /// A matrix with `n_rows` rows and no columns
    #[inline]
    #[must_use]
    pub fn empty(n_rows: usize) -> Self {
        Self {
            columns: Vec::new(),
            n_rows,
            data: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn zeros(n_rows: usize, columns: Vec<String>) -> Self {
        let data = vec![0.0; n_rows * columns.len()];
        Self {
            columns,
            n_rows,
            data,
        }
    }

    /// Build from equally sized rows
    pub fn from_rows(columns: Vec<String>, rows: &[Vec<f32>]) -> Result<Self> {
        let mut data = Vec::with_capacity(rows.len() * columns.len());
        for row in rows {
            if row.len() != columns.len() {
                return Err(Error::Dimension {
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(rows.len(), columns, data)
    }

    #[inline]
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// True when the matrix has no rows or no columns
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.columns.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        let n = self.columns.len();
        &self.data[i * n..(i + 1) * n]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        let n = self.columns.len();
        &mut self.data[i * n..(i + 1) * n]
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.columns.len() + j]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on 0, and a zero-width matrix still has rows
        let width = self.columns.len().max(1);
        let take = if self.columns.is_empty() { 0 } else { self.n_rows };
        self.data.chunks_exact(width).take(take)
    }

    /// Copy of column `j`
    #[must_use]
    pub fn column(&self, j: usize) -> Vec<f32> {
        (0..self.n_rows).map(|i| self.get(i, j)).collect()
    }

    /// Whether every entry is finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Concatenate matrices side by side
    ///
    /// All parts must have the same number of rows. Zero-width parts are
    /// allowed and contribute nothing.
    pub fn hstack(parts: &[Matrix]) -> Result<Matrix> {
        let n_rows = match parts.first() {
            Some(first) => first.n_rows,
            None => return Ok(Matrix::empty(0)),
        };
        for part in parts {
            if part.n_rows != n_rows {
                return Err(Error::shape("hstack", n_rows, part.n_rows));
            }
        }

        let columns: Vec<String> = parts
            .iter()
            .flat_map(|p| p.columns.iter().cloned())
            .collect();
        let mut data = Vec::with_capacity(n_rows * columns.len());
        for i in 0..n_rows {
            for part in parts.iter().filter(|p| !p.columns.is_empty()) {
                data.extend_from_slice(part.row(i));
            }
        }
        Matrix::new(n_rows, columns, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_validates_size() {
        assert!(Matrix::new(2, names(&["a", "b"]), vec![1.0, 2.0, 3.0]).is_err());
        let m = Matrix::new(2, names(&["a", "b"]), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.column(0), vec![1.0, 3.0]);
    }

    #[test]
    fn test_hstack() {
        let a = Matrix::new(2, names(&["a"]), vec![1.0, 2.0]).unwrap();
        let b = Matrix::new(2, names(&["b", "c"]), vec![3.0, 4.0, 5.0, 6.0]).unwrap();
        let stacked = Matrix::hstack(&[a, Matrix::empty(2), b]).unwrap();
        assert_eq!(stacked.column_names(), &names(&["a", "b", "c"])[..]);
        assert_eq!(stacked.row(0), &[1.0, 3.0, 4.0]);
        assert_eq!(stacked.row(1), &[2.0, 5.0, 6.0]);
    }

    #[test]
    fn test_hstack_row_mismatch() {
        let a = Matrix::zeros(2, names(&["a"]));
        let b = Matrix::zeros(3, names(&["b"]));
        assert!(matches!(
            Matrix::hstack(&[a, b]),
            Err(Error::DataShape { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_empty() {
        assert!(Matrix::empty(5).is_empty());
        assert_eq!(Matrix::empty(5).rows().count(), 0);
        assert!(Matrix::zeros(0, names(&["a"])).is_empty());
    }
}
