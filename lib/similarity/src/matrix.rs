use rayon::prelude::*;
use serde::Serialize;

/// N×N symmetric similarity matrix with values in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
    /// Largest pairwise Euclidean distance seen while building the matrix
    max_distance: f64,
}

impl SimilarityMatrix {
    /// Build from upper-triangle rows: `rows[i][k]` is cell `(i, i + k)`.
    ///
    /// Each cell is written to both `(i, j)` and `(j, i)`, so the result is
    /// exactly symmetric.
    pub fn from_upper_triangle(rows: Vec<Vec<f64>>) -> Self {
        let n = rows.len();
        let mut data = vec![0.0; n * n];
        for (i, row) in rows.into_iter().enumerate() {
            debug_assert_eq!(row.len(), n - i);
            for (k, value) in row.into_iter().enumerate() {
                let j = i + k;
                data[i * n + j] = value;
                data[j * n + i] = value;
            }
        }
        Self {
            n,
            data,
            max_distance: 0.0,
        }
    }

    /// Compute every cell with `i <= j` in parallel and mirror it
    pub fn from_pairs<F>(n: usize, cell: F) -> Self
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        let rows: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| (i..n).map(|j| cell(i, j)).collect())
            .collect();
        Self::from_upper_triangle(rows)
    }

    pub(crate) fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Similarities of entity `i` to every entity
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.n).map(move |i| self.row(i))
    }

    /// Global maximum Euclidean distance used to scale the continuous metric
    #[inline]
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i..self.n).all(|j| self.get(i, j).to_bits() == self.get(j, i).to_bits()))
    }

    /// Plain nested rows, for serialization to front-ends
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }
}
