//! # Pokemantle Similarity
//!
//! Pairwise similarity between every pair of catalog entities.
//!
//! ## Features
//!
//! - **Feature Schema**: Vocabularies derived from the catalog, one one-hot block per categorical family
//! - **Vectorization**: Each entity becomes a categorical vector and a continuous vector
//! - **Blended Metric**: Cosine over categories, max-normalized Euclidean over attributes, weighted 2:1
//! - **Ranking**: Every entity ordered by similarity to a target, with 0-100 scores
//! - **Explainability**: Shared categories and largest attribute gaps for any pair
//!
//! ## Example
//!
//! ```rust
//! use pokemantle_core::Catalog;
//! use pokemantle_similarity::{Ranking, SimilarityEngine};
//!
//! let catalog = Catalog::from_json_str(r#"[
//!     {"name": "charmander", "pokedex_number": 4, "type_1": "Fire", "height_m": 0.6},
//!     {"name": "vulpix", "pokedex_number": 37, "type_1": "Fire", "height_m": 0.6},
//!     {"name": "squirtle", "pokedex_number": 7, "type_1": "Water", "height_m": 0.5}
//! ]"#).unwrap();
//!
//! let matrix = SimilarityEngine::compute(&catalog);
//! assert!(matrix.is_symmetric());
//!
//! let ranking = Ranking::new(0, &catalog, &matrix);
//! assert_eq!(ranking.entries()[0].name, "charmander");
//! assert_eq!(ranking.grade(1).unwrap().rank, 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Schema    │────>│ Vectorizer  │────>│  Distance   │
//! │ (vocabs)    │     │ (entity→v)  │     │ (cos + euc) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Cache     │<────│   Matrix    │
//!                     │(fingerprint)│     │   (N×N)     │
//!                     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │  Explain    │     │    Rank     │
//!                     │  (pairs)    │     │  (target)   │
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod cache;
pub mod distance;
pub mod engine;
pub mod explain;
pub mod matrix;
pub mod rank;
pub mod schema;
pub mod vectorizer;

// Re-export main types for convenience
pub use cache::SimilarityCache;
pub use distance::{
    blend_cell, cosine_similarity_matrix, euclidean_similarity_matrix, COSINE_WEIGHT,
    EUCLIDEAN_WEIGHT,
};
pub use engine::SimilarityEngine;
pub use explain::{AttributeGap, SimilarityBreakdown};
pub use matrix::SimilarityMatrix;
pub use rank::{to_score, Grade, RankedEntry, RankedView, Ranking, TARGET_SCORE};
pub use schema::{CategoricalFamily, ContinuousAttribute, FeatureSchema, Vocabulary};
pub use vectorizer::{vectorize, FeatureMatrices, FeatureVector, FeatureVectorizer};
