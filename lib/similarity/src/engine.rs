//! Similarity Engine
//!
//! Runs the full pipeline for one catalog: vectorize, cosine over the
//! categorical matrix, Euclidean over the continuous matrix, blend.

use crate::distance::{blend, cosine_similarity_matrix, euclidean_similarity_matrix};
use crate::explain::SimilarityBreakdown;
use crate::matrix::SimilarityMatrix;
use crate::vectorizer::{FeatureMatrices, FeatureVectorizer};
use pokemantle_core::Catalog;
use std::time::Instant;
use tracing::debug;

/// Vectorized catalog ready for similarity computation
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    vectorizer: FeatureVectorizer,
    features: FeatureMatrices,
}

impl SimilarityEngine {
    /// Derive the schema from `catalog` and vectorize every entity
    pub fn fit(catalog: &Catalog) -> Self {
        let vectorizer = FeatureVectorizer::from_catalog(catalog);
        let features = vectorizer.vectorize(catalog);
        Self {
            vectorizer,
            features,
        }
    }

    pub fn vectorizer(&self) -> &FeatureVectorizer {
        &self.vectorizer
    }

    pub fn features(&self) -> &FeatureMatrices {
        &self.features
    }

    /// Blended N×N similarity matrix
    pub fn similarity_matrix(&self) -> SimilarityMatrix {
        let started = Instant::now();
        let cosine = cosine_similarity_matrix(&self.features.categorical);
        let euclidean = euclidean_similarity_matrix(&self.features.continuous);
        let matrix = blend(&cosine, &euclidean);
        debug!(
            entities = matrix.len(),
            max_distance = matrix.max_distance(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "similarity matrix computed"
        );
        matrix
    }

    /// Per-metric breakdown of the similarity between rows `i` and `j`
    pub fn explain(&self, matrix: &SimilarityMatrix, i: usize, j: usize) -> Option<SimilarityBreakdown> {
        SimilarityBreakdown::compute(self, matrix, i, j)
    }

    /// Compute the matrix in one call
    pub fn compute(catalog: &Catalog) -> SimilarityMatrix {
        Self::fit(catalog).similarity_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scenario_catalog() -> Catalog {
        Catalog::from_json_str(
            &json!([
                {"name": "a", "pokedex_number": 1, "type_1": "fire", "height_m": 1.0},
                {"name": "b", "pokedex_number": 2, "type_1": "fire", "height_m": 1.1},
                {"name": "c", "pokedex_number": 3, "type_1": "water", "height_m": 5.0}
            ])
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_shared_type_dominates() {
        let matrix = SimilarityEngine::compute(&scenario_catalog());
        assert!(matrix.get(1, 0) > matrix.get(2, 0));
    }

    #[test]
    fn test_properties() {
        let matrix = SimilarityEngine::compute(&scenario_catalog());
        assert_eq!(matrix.len(), 3);
        assert!(matrix.is_symmetric());
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 1.0);
        }
        assert!(matrix.iter_rows().flatten().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_deterministic() {
        let catalog = scenario_catalog();
        let a = SimilarityEngine::compute(&catalog);
        let b = SimilarityEngine::compute(&catalog);
        let bits = |m: &SimilarityMatrix| {
            m.iter_rows()
                .flatten()
                .map(|v| v.to_bits())
                .collect::<Vec<_>>()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_single_entity() {
        let catalog = Catalog::from_json_str(
            r#"[{"name": "mew", "pokedex_number": 151, "type_1": "Psychic"}]"#,
        )
        .unwrap();
        let matrix = SimilarityEngine::compute(&catalog);
        assert_eq!(matrix.to_rows(), vec![vec![1.0]]);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_json_str("[]").unwrap();
        assert!(SimilarityEngine::compute(&catalog).is_empty());
    }
}
