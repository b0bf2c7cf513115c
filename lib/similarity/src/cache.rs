//! Memoized similarity matrices keyed by catalog fingerprint

use crate::engine::SimilarityEngine;
use crate::matrix::SimilarityMatrix;
use ahash::AHashMap;
use parking_lot::RwLock;
use pokemantle_core::Catalog;
use std::sync::Arc;
use tracing::debug;

/// Shared cache of computed matrices
///
/// Two catalogs with the same content in the same order share one matrix.
#[derive(Debug, Default)]
pub struct SimilarityCache {
    entries: RwLock<AHashMap<String, Arc<SimilarityMatrix>>>,
}

impl SimilarityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached matrix for `catalog`, computing it on first use
    pub fn get_or_compute(&self, catalog: &Catalog) -> Arc<SimilarityMatrix> {
        let key = catalog.fingerprint();
        if let Some(matrix) = self.entries.read().get(key) {
            debug!(fingerprint = key, "similarity cache hit");
            return Arc::clone(matrix);
        }

        // computed outside the write lock; a racing writer's result wins
        let computed = Arc::new(SimilarityEngine::compute(catalog));
        let mut entries = self.entries.write();
        let matrix = entries.entry(key.to_string()).or_insert(computed);
        Arc::clone(matrix)
    }

    pub fn get(&self, catalog: &Catalog) -> Option<Arc<SimilarityMatrix>> {
        self.entries.read().get(catalog.fingerprint()).cloned()
    }

    pub fn contains(&self, catalog: &Catalog) -> bool {
        self.entries.read().contains_key(catalog.fingerprint())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
