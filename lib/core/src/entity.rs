//! Entity records
//!
//! One catalog member with its identity, categorical and continuous
//! attributes. Field names follow the external catalog JSON contract.
//! Deserialization is lenient: missing or malformed numbers become 0 and
//! missing or empty categories become `None`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// The closed set of elemental types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementalType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl ElementalType {
    /// All types in declaration order
    pub const ALL: [ElementalType; 18] = [
        ElementalType::Normal,
        ElementalType::Fire,
        ElementalType::Water,
        ElementalType::Electric,
        ElementalType::Grass,
        ElementalType::Ice,
        ElementalType::Fighting,
        ElementalType::Poison,
        ElementalType::Ground,
        ElementalType::Flying,
        ElementalType::Psychic,
        ElementalType::Bug,
        ElementalType::Rock,
        ElementalType::Ghost,
        ElementalType::Dragon,
        ElementalType::Dark,
        ElementalType::Steel,
        ElementalType::Fairy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementalType::Normal => "normal",
            ElementalType::Fire => "fire",
            ElementalType::Water => "water",
            ElementalType::Electric => "electric",
            ElementalType::Grass => "grass",
            ElementalType::Ice => "ice",
            ElementalType::Fighting => "fighting",
            ElementalType::Poison => "poison",
            ElementalType::Ground => "ground",
            ElementalType::Flying => "flying",
            ElementalType::Psychic => "psychic",
            ElementalType::Bug => "bug",
            ElementalType::Rock => "rock",
            ElementalType::Ghost => "ghost",
            ElementalType::Dragon => "dragon",
            ElementalType::Dark => "dark",
            ElementalType::Steel => "steel",
            ElementalType::Fairy => "fairy",
        }
    }

    /// Position in [`ElementalType::ALL`]
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ElementalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown elemental type: {0}")]
pub struct UnknownElementalType(pub String);

impl FromStr for ElementalType {
    type Err = UnknownElementalType;

    /// Case-insensitive; accepts the catalog's short `fight` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if lowered == "fight" {
            return Ok(ElementalType::Fighting);
        }
        ElementalType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| UnknownElementalType(s.to_string()))
    }
}

/// Boolean form flags carried by some catalog iterations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityFlag {
    AlternateForm,
    MegaEvolution,
    Gigantamax,
    Partner,
}

impl EntityFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityFlag::AlternateForm => "alternate_form",
            EntityFlag::MegaEvolution => "mega_evolution",
            EntityFlag::Gigantamax => "gigantamax",
            EntityFlag::Partner => "partner",
        }
    }
}

/// Damage multipliers taken from each attacking type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeEffectiveness {
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_normal: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_fire: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_water: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_electric: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_grass: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_ice: f64,
    #[serde(default, alias = "against_fighting", deserialize_with = "lenient_number")]
    pub against_fight: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_poison: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_ground: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_flying: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_psychic: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_bug: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_rock: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_ghost: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_dragon: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_dark: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_steel: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub against_fairy: f64,
}

impl TypeEffectiveness {
    pub fn against(&self, attacker: ElementalType) -> f64 {
        match attacker {
            ElementalType::Normal => self.against_normal,
            ElementalType::Fire => self.against_fire,
            ElementalType::Water => self.against_water,
            ElementalType::Electric => self.against_electric,
            ElementalType::Grass => self.against_grass,
            ElementalType::Ice => self.against_ice,
            ElementalType::Fighting => self.against_fight,
            ElementalType::Poison => self.against_poison,
            ElementalType::Ground => self.against_ground,
            ElementalType::Flying => self.against_flying,
            ElementalType::Psychic => self.against_psychic,
            ElementalType::Bug => self.against_bug,
            ElementalType::Rock => self.against_rock,
            ElementalType::Ghost => self.against_ghost,
            ElementalType::Dragon => self.against_dragon,
            ElementalType::Dark => self.against_dark,
            ElementalType::Steel => self.against_steel,
            ElementalType::Fairy => self.against_fairy,
        }
    }
}

/// One catalog member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable unique key (lowercase in well-formed catalogs)
    pub name: String,
    /// Catalog index used for asset lookup; see [`Entity::dex_number`]
    #[serde(default, deserialize_with = "lenient_index", skip_serializing_if = "Option::is_none")]
    pub pokedex_number: Option<u32>,
    /// Older catalogs carry the index as `id`; only read when `pokedex_number` is absent
    #[serde(default, deserialize_with = "lenient_index", skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(
        rename = "koreanName",
        alias = "display_name",
        default,
        deserialize_with = "lenient_category",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub type_1: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub type_2: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub ability_1: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub ability_2: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub ability_hidden: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub egg_type_1: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub egg_type_2: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub habitat: Option<String>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub experience_group: Option<String>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub height_m: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight_kg: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub base_experience: f64,
    #[serde(default, alias = "capture_rate", deserialize_with = "lenient_number")]
    pub catch_rate: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub evolution_stage: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub hp: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub attack: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub defense: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sp_attack: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sp_defense: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub speed: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub type_number: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub abilities_number: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub egg_type_number: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_points: f64,

    #[serde(flatten)]
    pub effectiveness: TypeEffectiveness,

    #[serde(default, deserialize_with = "lenient_flag")]
    pub has_alternate_form: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub has_mega_evolution: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub has_gigantamax: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_partner: bool,
}

impl Entity {
    /// An entity with only its identity set; every attribute takes its default.
    pub fn new(name: impl Into<String>, pokedex_number: u32) -> Self {
        Self {
            name: name.into(),
            pokedex_number: Some(pokedex_number),
            id: None,
            display_name: None,
            generation: None,
            status: None,
            species: None,
            type_1: None,
            type_2: None,
            ability_1: None,
            ability_2: None,
            ability_hidden: None,
            growth_rate: None,
            egg_type_1: None,
            egg_type_2: None,
            shape: None,
            color: None,
            habitat: None,
            experience_group: None,
            height_m: 0.0,
            weight_kg: 0.0,
            base_experience: 0.0,
            catch_rate: 0.0,
            evolution_stage: 0.0,
            hp: 0.0,
            attack: 0.0,
            defense: 0.0,
            sp_attack: 0.0,
            sp_defense: 0.0,
            speed: 0.0,
            type_number: 0.0,
            abilities_number: 0.0,
            egg_type_number: 0.0,
            total_points: 0.0,
            effectiveness: TypeEffectiveness::default(),
            has_alternate_form: false,
            has_mega_evolution: false,
            has_gigantamax: false,
            is_partner: false,
        }
    }

    /// Catalog index: `pokedex_number`, else `id`, else 0
    pub fn dex_number(&self) -> u32 {
        self.pokedex_number.or(self.id).unwrap_or(0)
    }

    /// Name shown to players, falling back to the key
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Recognized elemental types, without duplicates
    pub fn types(&self) -> SmallVec<[ElementalType; 2]> {
        let mut types = SmallVec::new();
        for raw in [&self.type_1, &self.type_2].into_iter().flatten() {
            if let Ok(t) = raw.parse::<ElementalType>() {
                if !types.contains(&t) {
                    types.push(t);
                }
            }
        }
        types
    }

    /// Type strings that are not one of the 18 elemental types
    pub fn unknown_types(&self) -> impl Iterator<Item = &str> {
        [&self.type_1, &self.type_2]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(|raw| raw.parse::<ElementalType>().is_err())
    }

    pub fn abilities(&self) -> SmallVec<[&str; 3]> {
        [&self.ability_1, &self.ability_2, &self.ability_hidden]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn egg_groups(&self) -> SmallVec<[&str; 2]> {
        [&self.egg_type_1, &self.egg_type_2]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Flags that are set
    pub fn flags(&self) -> SmallVec<[EntityFlag; 4]> {
        [
            (self.has_alternate_form, EntityFlag::AlternateForm),
            (self.has_mega_evolution, EntityFlag::MegaEvolution),
            (self.has_gigantamax, EntityFlag::Gigantamax),
            (self.is_partner, EntityFlag::Partner),
        ]
        .into_iter()
        .filter_map(|(set, flag)| set.then_some(flag))
        .collect()
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    Ok(if number.is_finite() { number } else { 0.0 })
}

fn lenient_index<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite() && n.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(n))
        .map(|n| n as u32))
}

fn lenient_category<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    })
}
