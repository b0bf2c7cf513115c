//! Feature schema
//!
//! Fixes which attributes take part in similarity and the column layout of
//! both feature matrices. Categorical vocabularies are derived from the
//! catalog (sorted, so layout is deterministic); the elemental type block
//! uses the closed 18-value enumeration; the continuous block has one column
//! per [`ContinuousAttribute`].

use ahash::AHashMap;
use pokemantle_core::{Catalog, ElementalType, Entity};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// A group of one-hot columns derived from one categorical attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalFamily {
    Generation,
    Status,
    Species,
    Types,
    Abilities,
    GrowthRate,
    EggGroups,
    Shape,
    Color,
    Habitat,
    ExperienceGroup,
    Flags,
}

impl CategoricalFamily {
    /// Families in column order
    pub const ALL: [CategoricalFamily; 12] = [
        CategoricalFamily::Generation,
        CategoricalFamily::Status,
        CategoricalFamily::Species,
        CategoricalFamily::Types,
        CategoricalFamily::Abilities,
        CategoricalFamily::GrowthRate,
        CategoricalFamily::EggGroups,
        CategoricalFamily::Shape,
        CategoricalFamily::Color,
        CategoricalFamily::Habitat,
        CategoricalFamily::ExperienceGroup,
        CategoricalFamily::Flags,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoricalFamily::Generation => "generation",
            CategoricalFamily::Status => "status",
            CategoricalFamily::Species => "species",
            CategoricalFamily::Types => "types",
            CategoricalFamily::Abilities => "abilities",
            CategoricalFamily::GrowthRate => "growth_rate",
            CategoricalFamily::EggGroups => "egg_groups",
            CategoricalFamily::Shape => "shape",
            CategoricalFamily::Color => "color",
            CategoricalFamily::Habitat => "habitat",
            CategoricalFamily::ExperienceGroup => "experience_group",
            CategoricalFamily::Flags => "flags",
        }
    }

    /// Values this entity contributes to the family (one hit each)
    pub fn values(self, entity: &Entity) -> SmallVec<[&str; 3]> {
        match self {
            CategoricalFamily::Generation => single(&entity.generation),
            CategoricalFamily::Status => single(&entity.status),
            CategoricalFamily::Species => single(&entity.species),
            CategoricalFamily::Types => entity.types().iter().map(|t| t.as_str()).collect(),
            CategoricalFamily::Abilities => entity.abilities(),
            CategoricalFamily::GrowthRate => single(&entity.growth_rate),
            CategoricalFamily::EggGroups => entity.egg_groups().into_iter().collect(),
            CategoricalFamily::Shape => single(&entity.shape),
            CategoricalFamily::Color => single(&entity.color),
            CategoricalFamily::Habitat => single(&entity.habitat),
            CategoricalFamily::ExperienceGroup => single(&entity.experience_group),
            CategoricalFamily::Flags => entity.flags().iter().map(|f| f.as_str()).collect(),
        }
    }
}

fn single(value: &Option<String>) -> SmallVec<[&str; 3]> {
    value.as_deref().into_iter().collect()
}

/// The ordered set of values one family can take
#[derive(Debug, Clone)]
pub struct Vocabulary {
    family: CategoricalFamily,
    values: Vec<String>,
    lookup: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Sorted distinct values observed in the catalog, or the fixed type list
    pub fn observe(family: CategoricalFamily, catalog: &Catalog) -> Self {
        let values: Vec<String> = match family {
            CategoricalFamily::Types => ElementalType::ALL
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            _ => catalog
                .iter()
                .flat_map(|entity| family.values(entity))
                .collect::<BTreeSet<&str>>()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        let lookup = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();

        Self {
            family,
            values,
            lookup,
        }
    }

    #[inline]
    pub fn family(&self) -> CategoricalFamily {
        self.family
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[inline]
    pub fn position(&self, value: &str) -> Option<usize> {
        self.lookup.get(value).copied()
    }
}

/// One continuous column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContinuousAttribute {
    TypeNumber,
    HeightM,
    WeightKg,
    AbilitiesNumber,
    TotalPoints,
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    EggTypeNumber,
    Against(ElementalType),
    BaseExperience,
    CaptureRate,
    EvolutionStage,
}

impl ContinuousAttribute {
    /// Columns in matrix order
    pub const ALL: [ContinuousAttribute; 33] = [
        ContinuousAttribute::TypeNumber,
        ContinuousAttribute::HeightM,
        ContinuousAttribute::WeightKg,
        ContinuousAttribute::AbilitiesNumber,
        ContinuousAttribute::TotalPoints,
        ContinuousAttribute::Hp,
        ContinuousAttribute::Attack,
        ContinuousAttribute::Defense,
        ContinuousAttribute::SpAttack,
        ContinuousAttribute::SpDefense,
        ContinuousAttribute::Speed,
        ContinuousAttribute::EggTypeNumber,
        ContinuousAttribute::Against(ElementalType::Normal),
        ContinuousAttribute::Against(ElementalType::Fire),
        ContinuousAttribute::Against(ElementalType::Water),
        ContinuousAttribute::Against(ElementalType::Electric),
        ContinuousAttribute::Against(ElementalType::Grass),
        ContinuousAttribute::Against(ElementalType::Ice),
        ContinuousAttribute::Against(ElementalType::Fighting),
        ContinuousAttribute::Against(ElementalType::Poison),
        ContinuousAttribute::Against(ElementalType::Ground),
        ContinuousAttribute::Against(ElementalType::Flying),
        ContinuousAttribute::Against(ElementalType::Psychic),
        ContinuousAttribute::Against(ElementalType::Bug),
        ContinuousAttribute::Against(ElementalType::Rock),
        ContinuousAttribute::Against(ElementalType::Ghost),
        ContinuousAttribute::Against(ElementalType::Dragon),
        ContinuousAttribute::Against(ElementalType::Dark),
        ContinuousAttribute::Against(ElementalType::Steel),
        ContinuousAttribute::Against(ElementalType::Fairy),
        ContinuousAttribute::BaseExperience,
        ContinuousAttribute::CaptureRate,
        ContinuousAttribute::EvolutionStage,
    ];

    /// Catalog field name
    pub fn name(self) -> &'static str {
        match self {
            ContinuousAttribute::TypeNumber => "type_number",
            ContinuousAttribute::HeightM => "height_m",
            ContinuousAttribute::WeightKg => "weight_kg",
            ContinuousAttribute::AbilitiesNumber => "abilities_number",
            ContinuousAttribute::TotalPoints => "total_points",
            ContinuousAttribute::Hp => "hp",
            ContinuousAttribute::Attack => "attack",
            ContinuousAttribute::Defense => "defense",
            ContinuousAttribute::SpAttack => "sp_attack",
            ContinuousAttribute::SpDefense => "sp_defense",
            ContinuousAttribute::Speed => "speed",
            ContinuousAttribute::EggTypeNumber => "egg_type_number",
            ContinuousAttribute::Against(t) => match t {
                ElementalType::Normal => "against_normal",
                ElementalType::Fire => "against_fire",
                ElementalType::Water => "against_water",
                ElementalType::Electric => "against_electric",
                ElementalType::Grass => "against_grass",
                ElementalType::Ice => "against_ice",
                ElementalType::Fighting => "against_fight",
                ElementalType::Poison => "against_poison",
                ElementalType::Ground => "against_ground",
                ElementalType::Flying => "against_flying",
                ElementalType::Psychic => "against_psychic",
                ElementalType::Bug => "against_bug",
                ElementalType::Rock => "against_rock",
                ElementalType::Ghost => "against_ghost",
                ElementalType::Dragon => "against_dragon",
                ElementalType::Dark => "against_dark",
                ElementalType::Steel => "against_steel",
                ElementalType::Fairy => "against_fairy",
            },
            ContinuousAttribute::BaseExperience => "base_experience",
            ContinuousAttribute::CaptureRate => "catch_rate",
            ContinuousAttribute::EvolutionStage => "evolution_stage",
        }
    }

    pub fn value(self, entity: &Entity) -> f64 {
        match self {
            ContinuousAttribute::TypeNumber => entity.type_number,
            ContinuousAttribute::HeightM => entity.height_m,
            ContinuousAttribute::WeightKg => entity.weight_kg,
            ContinuousAttribute::AbilitiesNumber => entity.abilities_number,
            ContinuousAttribute::TotalPoints => entity.total_points,
            ContinuousAttribute::Hp => entity.hp,
            ContinuousAttribute::Attack => entity.attack,
            ContinuousAttribute::Defense => entity.defense,
            ContinuousAttribute::SpAttack => entity.sp_attack,
            ContinuousAttribute::SpDefense => entity.sp_defense,
            ContinuousAttribute::Speed => entity.speed,
            ContinuousAttribute::EggTypeNumber => entity.egg_type_number,
            ContinuousAttribute::Against(t) => entity.effectiveness.against(t),
            ContinuousAttribute::BaseExperience => entity.base_experience,
            ContinuousAttribute::CaptureRate => entity.catch_rate,
            ContinuousAttribute::EvolutionStage => entity.evolution_stage,
        }
    }
}

/// Column layout for one catalog
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    vocabularies: Vec<Vocabulary>,
    offsets: Vec<usize>,
    categorical_width: usize,
}

impl FeatureSchema {
    /// Derive every vocabulary from the catalog
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let vocabularies: Vec<Vocabulary> = CategoricalFamily::ALL
            .iter()
            .map(|&family| Vocabulary::observe(family, catalog))
            .collect();

        let mut offsets = Vec::with_capacity(vocabularies.len());
        let mut categorical_width = 0;
        for vocabulary in &vocabularies {
            offsets.push(categorical_width);
            categorical_width += vocabulary.len();
        }

        Self {
            vocabularies,
            offsets,
            categorical_width,
        }
    }

    #[inline]
    pub fn categorical_width(&self) -> usize {
        self.categorical_width
    }

    #[inline]
    pub fn continuous_width(&self) -> usize {
        ContinuousAttribute::ALL.len()
    }

    pub fn continuous_attributes(&self) -> &'static [ContinuousAttribute] {
        &ContinuousAttribute::ALL
    }

    pub fn vocabularies(&self) -> &[Vocabulary] {
        &self.vocabularies
    }

    pub fn vocabulary(&self, family: CategoricalFamily) -> Option<&Vocabulary> {
        self.vocabularies.iter().find(|v| v.family() == family)
    }

    /// `family:value` label for each categorical column
    pub fn categorical_labels(&self) -> Vec<String> {
        self.vocabularies
            .iter()
            .flat_map(|vocabulary| {
                vocabulary
                    .values()
                    .iter()
                    .map(move |value| format!("{}:{}", vocabulary.family().name(), value))
            })
            .collect()
    }

    /// Write the one-hot row for `entity` into `out` (length = categorical width)
    pub fn encode_categorical(&self, entity: &Entity, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.categorical_width);
        out.fill(0.0);
        for (vocabulary, &offset) in self.vocabularies.iter().zip(&self.offsets) {
            for value in vocabulary.family().values(entity) {
                if let Some(pos) = vocabulary.position(value) {
                    out[offset + pos] = 1.0;
                }
            }
        }
    }

    /// Write the raw continuous row for `entity` into `out`
    pub fn encode_continuous(&self, entity: &Entity, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.continuous_width());
        for (slot, attribute) in out.iter_mut().zip(ContinuousAttribute::ALL) {
            *slot = attribute.value(entity);
        }
    }
}
