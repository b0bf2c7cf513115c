use pokemantle_core::{Catalog, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of suggestions shown for a partial guess
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Settings for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// JSON array of catalog entities
    pub catalog_path: PathBuf,
    /// Fixed seed for target selection; `None` draws from the OS
    pub seed: Option<u64>,
    pub suggestion_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/pokemon.json"),
            seed: None,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl GameConfig {
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.suggestion_limit == 0 {
            return Err(Error::InvalidConfig(
                "suggestion_limit must be at least 1".to_string(),
            ));
        }
        if self.catalog_path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("catalog_path is empty".to_string()));
        }
        Ok(())
    }

    /// Validate, then load the catalog named by `catalog_path`
    pub fn load_catalog(&self) -> Result<Catalog> {
        self.validate()?;
        Catalog::from_path(&self.catalog_path)
    }
}
