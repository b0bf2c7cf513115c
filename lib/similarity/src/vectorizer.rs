//! Feature Vectorizer
//!
//! Converts entities into the two feature rows the similarity engine works
//! on: a one-hot categorical row and a raw continuous row. Column layout comes
//! from the [`FeatureSchema`] derived for the catalog.

use crate::schema::FeatureSchema;
use pokemantle_core::{Catalog, Entity, Matrix};
use tracing::debug;

/// Feature rows for a single entity
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub categorical: Vec<f64>,
    pub continuous: Vec<f64>,
}

/// Feature matrices for a whole catalog, one row per entity in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrices {
    pub categorical: Matrix,
    pub continuous: Matrix,
}

impl FeatureMatrices {
    #[inline]
    pub fn len(&self) -> usize {
        self.categorical.rows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.categorical.is_empty()
    }
}

/// Vectorizer bound to one catalog's schema
#[derive(Debug, Clone)]
pub struct FeatureVectorizer {
    schema: FeatureSchema,
}

impl FeatureVectorizer {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    /// Derive the schema from the catalog and bind to it
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(FeatureSchema::from_catalog(catalog))
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn categorical_dim(&self) -> usize {
        self.schema.categorical_width()
    }

    pub fn continuous_dim(&self) -> usize {
        self.schema.continuous_width()
    }

    /// Feature rows for one entity
    ///
    /// Values outside the catalog's vocabularies are ignored.
    pub fn embed(&self, entity: &Entity) -> FeatureVector {
        let mut categorical = vec![0.0; self.categorical_dim()];
        let mut continuous = vec![0.0; self.continuous_dim()];
        self.schema.encode_categorical(entity, &mut categorical);
        self.schema.encode_continuous(entity, &mut continuous);
        FeatureVector {
            categorical,
            continuous,
        }
    }

    /// Feature matrices for every entity, in catalog order
    pub fn vectorize(&self, catalog: &Catalog) -> FeatureMatrices {
        let mut categorical = Matrix::zeros(catalog.len(), self.categorical_dim());
        let mut continuous = Matrix::zeros(catalog.len(), self.continuous_dim());

        for (i, entity) in catalog.iter().enumerate() {
            self.schema.encode_categorical(entity, categorical.row_mut(i));
            self.schema.encode_continuous(entity, continuous.row_mut(i));
        }

        debug!(
            rows = catalog.len(),
            categorical = self.categorical_dim(),
            continuous = self.continuous_dim(),
            "catalog vectorized"
        );

        FeatureMatrices {
            categorical,
            continuous,
        }
    }
}

/// Derive the schema from `catalog` and vectorize it
pub fn vectorize(catalog: &Catalog) -> FeatureMatrices {
    FeatureVectorizer::from_catalog(catalog).vectorize(catalog)
}
