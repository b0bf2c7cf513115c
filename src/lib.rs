//! # Pokemantle
//!
//! A Pokémon guessing game. The player hunts for a secret target and every
//! guess is answered with its rank and a 0-100 similarity score.
//!
//! Similarity is computed once per catalog: categorical attributes are
//! one-hot encoded and compared with cosine similarity, numeric attributes
//! are max-normalized and compared by Euclidean distance, and the two are
//! blended 2:1.
//!
//! ## Quick Start
//!
//! ### As a Game
//!
//! ```bash
//! pokemantle play --catalog data/pokemon.json
//! pokemantle rank --catalog data/pokemon.json --target pikachu --limit 20
//! pokemantle grade --catalog data/pokemon.json --target pikachu --guess raichu --explain
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use pokemantle::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::from_json_str(r#"[
//!     {"name": "a", "pokedex_number": 1, "type_1": "fire", "height_m": 1.0},
//!     {"name": "b", "pokedex_number": 2, "type_1": "fire", "height_m": 1.1},
//!     {"name": "c", "pokedex_number": 3, "type_1": "water", "height_m": 5.0}
//! ]"#).unwrap());
//!
//! let cache = SimilarityCache::new();
//! let matrix = cache.get_or_compute(&catalog);
//! assert!(matrix.get(1, 0) > matrix.get(2, 0));
//!
//! let mut session = GameSession::with_target_name(Arc::clone(&catalog), &matrix, "a").unwrap();
//! let outcome = session.submit("b").unwrap();
//! assert_eq!(outcome.record().rank, 2);
//! ```
//!
//! ## Crate Structure
//!
//! - `pokemantle-core` - Entities, catalog loading, dense matrices and vector kernels
//! - `pokemantle-similarity` - Vectorization, the similarity matrix, ranking and explanations
//! - `pokemantle-game` - Guess matching, suggestions, round state and configuration

// Re-export core types
pub use pokemantle_core::{Catalog, ElementalType, Entity, EntityFlag, Error, Result};

// Re-export the similarity engine
pub use pokemantle_similarity::{
    FeatureMatrices, FeatureVectorizer, Grade, RankedEntry, RankedView, Ranking,
    SimilarityBreakdown, SimilarityCache, SimilarityEngine, SimilarityMatrix,
};

// Re-export the game
pub use pokemantle_game::{
    match_guess, suggest, GameConfig, GameSession, GuessError, GuessOutcome, GuessRecord,
    RoundState,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        match_guess, suggest, Catalog, Entity, Error, GameConfig, GameSession, Grade, GuessError,
        GuessOutcome, GuessRecord, Ranking, Result, RoundState, SimilarityCache,
        SimilarityEngine, SimilarityMatrix,
    };
}
