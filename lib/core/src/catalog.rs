//! Catalog loading and lookup
//!
//! A [`Catalog`] is the ordered, validated list of entities for a session.
//! Order matters: it fixes matrix row indices and ranking tie-breaks.

use crate::{Entity, Error, Result};
use ahash::AHashMap;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Ordered collection of entities with a case-insensitive key index
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<Entity>,
    index: AHashMap<String, usize>,
    fingerprint: String,
}

impl Catalog {
    /// Validate and index a list of entities
    pub fn new(entities: Vec<Entity>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(entities.len());
        let mut hasher = Sha256::new();

        for (position, entity) in entities.iter().enumerate() {
            if entity.name.trim().is_empty() {
                return Err(Error::InvalidEntity {
                    position,
                    reason: "name is empty".to_string(),
                });
            }

            let key = entity.name.to_lowercase();
            if index.insert(key, position).is_some() {
                return Err(Error::DuplicateEntity(entity.name.clone()));
            }

            for unknown in entity.unknown_types() {
                warn!(entity = %entity.name, value = unknown, "ignoring unknown elemental type");
            }

            hasher.update(serde_json::to_vec(entity)?);
            hasher.update(b"\n");
        }

        if entities.is_empty() {
            warn!("catalog is empty");
        }

        let fingerprint = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();

        debug!(entities = entities.len(), "catalog loaded");
        Ok(Self {
            entities,
            index,
            fingerprint,
        })
    }

    /// Parse a JSON array of entity records
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entities: Vec<Entity> = serde_json::from_str(json)?;
        Self::new(entities)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let entities: Vec<Entity> = serde_json::from_reader(reader)?;
        Self::new(entities)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    /// Row index of the entity with this key, ignoring case
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(&key.to_lowercase()).copied()
    }

    /// Like [`Catalog::position`] but fails with [`Error::EntityNotFound`]
    pub fn require(&self, key: &str) -> Result<usize> {
        self.position(key)
            .ok_or_else(|| Error::EntityNotFound(key.to_string()))
    }

    /// SHA-256 over the canonical JSON of every entity, in order
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
