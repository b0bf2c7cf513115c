//! # Pokemantle Game
//!
//! Guess matching, suggestions and the round state machine.
//!
//! ```rust
//! use pokemantle_core::Catalog;
//! use pokemantle_game::{GameSession, GuessError};
//! use pokemantle_similarity::SimilarityEngine;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::from_json_str(r#"[
//!     {"name": "bulbasaur", "pokedex_number": 1, "type_1": "Grass"},
//!     {"name": "oddish", "pokedex_number": 43, "type_1": "Grass"}
//! ]"#).unwrap());
//! let matrix = SimilarityEngine::compute(&catalog);
//!
//! let mut session = GameSession::with_target_name(catalog, &matrix, "oddish").unwrap();
//! assert_eq!(session.submit("bulbasaur").unwrap().record().rank, 2);
//! assert!(matches!(session.submit("missingno"), Err(GuessError::NotFound(_))));
//! assert!(session.submit("Oddish").unwrap().is_solved());
//! ```

pub mod config;
pub mod matcher;
pub mod session;

pub use config::{GameConfig, DEFAULT_SUGGESTION_LIMIT};
pub use matcher::{match_guess, suggest};
pub use session::{GameSession, GuessError, GuessOutcome, GuessRecord, RoundState};
