//! Explainability for similarity scores
//!
//! Breaks a blended score into its two metrics and lists which categorical
//! columns two entities share and which continuous attributes differ most.

use crate::distance::cosine_cell;
use crate::engine::SimilarityEngine;
use crate::matrix::SimilarityMatrix;
use pokemantle_core::vector::{l2_distance, norm};
use serde::Serialize;

/// Number of continuous attributes reported in [`SimilarityBreakdown::largest_gaps`]
pub const MAX_REPORTED_GAPS: usize = 5;

/// Difference on one continuous attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeGap {
    pub attribute: &'static str,
    pub left: f64,
    pub right: f64,
    /// Absolute difference after max-normalization, in [0, 1] for non-negative data
    pub normalized_gap: f64,
}

/// Per-metric view of one cell of the similarity matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    pub cosine: f64,
    pub euclidean: f64,
    /// The matrix cell itself
    pub blended: f64,
    /// `family:value` labels set for both entities
    pub shared_categories: Vec<String>,
    pub largest_gaps: Vec<AttributeGap>,
}

impl SimilarityBreakdown {
    /// Breakdown for rows `i` and `j`; `None` if either is out of range
    pub fn compute(
        engine: &SimilarityEngine,
        matrix: &SimilarityMatrix,
        i: usize,
        j: usize,
    ) -> Option<Self> {
        let features = engine.features();
        let n = features.len();
        if i >= n || j >= n || matrix.len() != n {
            return None;
        }

        let (cat_i, cat_j) = (features.categorical.row(i), features.categorical.row(j));
        let cosine = if i == j {
            if norm(cat_i) == 0.0 { 0.0 } else { 1.0 }
        } else {
            cosine_cell(cat_i, cat_j, norm(cat_i), norm(cat_j))
        };

        let maxs = features.continuous.column_max();
        let normalize = |row: &[f64]| -> Vec<f64> {
            row.iter()
                .zip(&maxs)
                .map(|(&v, &max)| if max != 0.0 { v / max } else { 0.0 })
                .collect()
        };
        let (num_i, num_j) = (features.continuous.row(i), features.continuous.row(j));
        let (norm_i, norm_j) = (normalize(num_i), normalize(num_j));

        let max_distance = matrix.max_distance();
        let euclidean = if i == j {
            1.0
        } else if max_distance > 0.0 {
            1.0 - l2_distance(&norm_i, &norm_j) / max_distance
        } else {
            0.0
        };

        let shared_categories = engine
            .vectorizer()
            .schema()
            .categorical_labels()
            .into_iter()
            .zip(cat_i.iter().zip(cat_j))
            .filter(|(_, (a, b))| **a > 0.0 && **b > 0.0)
            .map(|(label, _)| label)
            .collect();

        let attributes = engine.vectorizer().schema().continuous_attributes();
        let mut largest_gaps: Vec<AttributeGap> = attributes
            .iter()
            .enumerate()
            .map(|(k, attribute)| AttributeGap {
                attribute: attribute.name(),
                left: num_i[k],
                right: num_j[k],
                normalized_gap: (norm_i[k] - norm_j[k]).abs(),
            })
            .filter(|gap| gap.normalized_gap > 0.0)
            .collect();
        largest_gaps.sort_by(|a, b| {
            b.normalized_gap
                .partial_cmp(&a.normalized_gap)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        largest_gaps.truncate(MAX_REPORTED_GAPS);

        Some(Self {
            cosine,
            euclidean,
            blended: matrix.get(i, j),
            shared_categories,
            largest_gaps,
        })
    }
}
