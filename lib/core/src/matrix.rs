use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Dense row-major matrix of `f64`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Empty matrix with a fixed column count, ready for [`Matrix::push_row`]
    #[must_use]
    pub fn with_columns(cols: usize, row_capacity: usize) -> Self {
        Self {
            rows: 0,
            cols,
            data: Vec::with_capacity(cols * row_capacity),
        }
    }

    pub fn push_row(&mut self, row: &[f64]) -> Result<()> {
        if row.len() != self.cols {
            return Err(Error::InvalidDimension {
                expected: self.cols,
                actual: row.len(),
            });
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // a zero-width matrix still yields `rows` empty rows
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Per-column maximum, floored at 0
    pub fn column_max(&self) -> Vec<f64> {
        let mut maxs = vec![0.0f64; self.cols];
        for row in self.iter_rows() {
            for (max, &v) in maxs.iter_mut().zip(row) {
                if v > *max {
                    *max = v;
                }
            }
        }
        maxs
    }

    /// Divide every column by its maximum; a column whose maximum is 0 becomes all 0.
    #[must_use]
    pub fn max_normalized(&self) -> Self {
        let maxs = self.column_max();
        let mut out = Matrix::zeros(self.rows, self.cols);
        for i in 0..self.rows {
            for ((slot, &v), &max) in out.row_mut(i).iter_mut().zip(self.row(i)).zip(&maxs) {
                *slot = if max != 0.0 { v / max } else { 0.0 };
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        let mut m = Matrix::with_columns(3, 2);
        m.push_row(&[1.0, 0.0, 4.0]).unwrap();
        m.push_row(&[2.0, 0.0, -1.0]).unwrap();
        m
    }

    #[test]
    fn test_shape_and_access() {
        let m = sample();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.row(1), &[2.0, 0.0, -1.0]);
        assert_eq!(m.get(0, 2), 4.0);
    }

    #[test]
    fn test_column_max_floored_at_zero() {
        let mut m = Matrix::with_columns(1, 2);
        m.push_row(&[-3.0]).unwrap();
        m.push_row(&[-1.0]).unwrap();
        assert_eq!(m.column_max(), vec![0.0]);
    }

    #[test]
    fn test_max_normalized() {
        let n = sample().max_normalized();
        assert_eq!(n.row(0), &[0.5, 0.0, 1.0]);
        assert_eq!(n.row(1), &[1.0, 0.0, -0.25]);
    }

    #[test]
    fn test_zero_width_rows() {
        let mut m = Matrix::with_columns(0, 3);
        m.push_row(&[]).unwrap();
        m.push_row(&[]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.iter_rows().count(), 2);
        assert!(m.row(1).is_empty());
    }

    #[test]
    fn test_push_row_width_mismatch() {
        let mut m = Matrix::with_columns(2, 1);
        assert!(matches!(
            m.push_row(&[1.0]),
            Err(Error::InvalidDimension { expected: 2, actual: 1 })
        ));
        assert!(m.is_empty());
    }

    #[test]
    fn test_row_mut() {
        let mut m = Matrix::zeros(2, 2);
        m.row_mut(1).copy_from_slice(&[3.0, 4.0]);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.row(0), &[0.0, 0.0]);
    }
}
