//! Similarity metrics over feature matrices
//!
//! Both metrics return a [`SimilarityMatrix`] with values in [0.0, 1.0] where
//! 1.0 means identical. Only the upper triangle is computed; the lower
//! triangle is a mirror.

use crate::matrix::SimilarityMatrix;
use pokemantle_core::vector::{dot, l2_distance, norm};
use pokemantle_core::Matrix;
use rayon::prelude::*;

/// Weight of the categorical (cosine) metric in the blend
pub const COSINE_WEIGHT: f64 = 2.0;

/// Weight of the continuous (Euclidean) metric in the blend
pub const EUCLIDEAN_WEIGHT: f64 = 1.0;

/// Cosine similarity between every pair of rows
///
/// A zero-norm row has similarity 0 to everything, itself included. A
/// non-zero row has similarity exactly 1 to itself.
pub fn cosine_similarity_matrix(features: &Matrix) -> SimilarityMatrix {
    let norms: Vec<f64> = features.iter_rows().map(norm).collect();

    SimilarityMatrix::from_pairs(features.rows(), |i, j| {
        if i == j {
            return if norms[i] == 0.0 { 0.0 } else { 1.0 };
        }
        cosine_cell(features.row(i), features.row(j), norms[i], norms[j])
    })
}

/// Cosine similarity of two distinct rows with precomputed norms
#[inline]
pub fn cosine_cell(a: &[f64], b: &[f64], norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot(a, b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Euclidean similarity between every pair of rows
///
/// Columns are max-normalized first, then `sim = 1 - d / max_d` where `max_d`
/// is the largest pairwise distance. When every pair is at distance 0 the
/// off-diagonal similarity is 0. The diagonal is always 1.
pub fn euclidean_similarity_matrix(features: &Matrix) -> SimilarityMatrix {
    let normalized = features.max_normalized();
    let distances = SimilarityMatrix::from_pairs(normalized.rows(), |i, j| {
        if i == j {
            0.0
        } else {
            l2_distance(normalized.row(i), normalized.row(j))
        }
    });

    let max_distance = (0..distances.len())
        .into_par_iter()
        .map(|i| distances.row(i).iter().copied().fold(0.0f64, f64::max))
        .reduce(|| 0.0, f64::max);

    SimilarityMatrix::from_pairs(distances.len(), |i, j| {
        if i == j {
            1.0
        } else if max_distance > 0.0 {
            1.0 - distances.get(i, j) / max_distance
        } else {
            0.0
        }
    })
    .with_max_distance(max_distance)
}

/// Weighted blend of the two metrics: `(cosine*2 + euclidean*1) / 3`
///
/// Both matrices come from the same [`FeatureMatrices`](crate::FeatureMatrices),
/// so they always have the same size.
pub(crate) fn blend(cosine: &SimilarityMatrix, euclidean: &SimilarityMatrix) -> SimilarityMatrix {
    debug_assert_eq!(cosine.len(), euclidean.len(), "metric matrices differ in size");
    SimilarityMatrix::from_pairs(cosine.len(), |i, j| {
        blend_cell(cosine.get(i, j), euclidean.get(i, j))
    })
    .with_max_distance(euclidean.max_distance())
}

#[inline]
pub fn blend_cell(cosine: f64, euclidean: f64) -> f64 {
    (cosine * COSINE_WEIGHT + euclidean * EUCLIDEAN_WEIGHT) / (COSINE_WEIGHT + EUCLIDEAN_WEIGHT)
}
