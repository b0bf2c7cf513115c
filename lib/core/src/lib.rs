//! # Pokemantle Core
//!
//! Core library for the Pokemantle guessing game.
//!
//! This crate provides the data model the similarity engine works on:
//!
//! - [`Entity`] - One catalog member with categorical and continuous attributes
//! - [`Catalog`] - Ordered, validated entity list with key lookup and a content fingerprint
//! - [`Matrix`] - Dense row-major `f64` matrix used for feature rows
//! - [`vector`] - Deterministic scalar dot product, norm and L2 kernels
//!
//! ## Example
//!
//! ```rust
//! use pokemantle_core::{Catalog, ElementalType};
//!
//! let catalog = Catalog::from_json_str(r#"[
//!     {"name": "charmander", "pokedex_number": 4, "type_1": "Fire", "height_m": 0.6},
//!     {"name": "squirtle", "pokedex_number": 7, "type_1": "Water", "height_m": 0.5}
//! ]"#).unwrap();
//!
//! let idx = catalog.position("Charmander").unwrap();
//! assert_eq!(catalog.get(idx).unwrap().types().as_slice(), &[ElementalType::Fire]);
//! ```

pub mod catalog;
pub mod entity;
pub mod error;
pub mod matrix;
pub mod vector;

pub use catalog::Catalog;
pub use entity::{ElementalType, Entity, EntityFlag, TypeEffectiveness, UnknownElementalType};
pub use error::{Error, Result};
pub use matrix::Matrix;
