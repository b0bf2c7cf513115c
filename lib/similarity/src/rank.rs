//! Ranking and grading against a target
//!
//! Orders the whole catalog by similarity to one target and answers
//! "what rank and score does this guess get".

use crate::matrix::SimilarityMatrix;
use pokemantle_core::{Catalog, Entity};
use serde::Serialize;
use tracing::warn;

/// Score given to the target itself
pub const TARGET_SCORE: u8 = 100;

/// Convert a similarity in [0, 1] to an integer score in 0..=100
#[inline]
pub fn to_score(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

/// One entity in a ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// Row in the catalog
    pub index: usize,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub score: u8,
}

/// Rank and score of a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grade {
    /// 1-based position in the ranking
    pub rank: usize,
    pub score: u8,
}

/// Every catalog entity ordered by similarity to a target
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    target: Option<usize>,
    entries: Vec<RankedEntry>,
    /// `positions[catalog index]` is the 0-based position in `entries`
    positions: Vec<usize>,
}

impl Ranking {
    /// Rank the catalog against the entity at `target`
    ///
    /// The target comes first with score 100. Everyone else is sorted by
    /// descending score; equal scores keep catalog order. An empty catalog,
    /// an out-of-range target or a matrix of the wrong size gives an empty
    /// ranking.
    pub fn new(target: usize, catalog: &Catalog, matrix: &SimilarityMatrix) -> Self {
        if catalog.is_empty() || target >= catalog.len() || matrix.len() != catalog.len() {
            if !catalog.is_empty() {
                warn!(
                    target_index = target,
                    catalog = catalog.len(),
                    matrix = matrix.len(),
                    "cannot rank: target or matrix does not match catalog"
                );
            }
            return Self::default();
        }

        let entry = |index: usize, entity: &Entity, score: u8| RankedEntry {
            index,
            name: entity.name.clone(),
            display_name: entity.display_name().to_string(),
            score,
        };

        let mut others: Vec<RankedEntry> = catalog
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != target)
            .map(|(i, entity)| entry(i, entity, to_score(matrix.get(i, target))))
            .collect();
        // stable: ties stay in catalog order
        others.sort_by(|a, b| b.score.cmp(&a.score));

        let mut entries = Vec::with_capacity(catalog.len());
        if let Some(target_entity) = catalog.get(target) {
            entries.push(entry(target, target_entity, TARGET_SCORE));
        }
        entries.extend(others);

        let mut positions = vec![0; catalog.len()];
        for (position, entry) in entries.iter().enumerate() {
            positions[entry.index] = position;
        }

        Self {
            target: Some(target),
            entries,
            positions,
        }
    }

    /// Catalog index of the target
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn target_entry(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self, k: usize) -> &[RankedEntry] {
        &self.entries[..k.min(self.entries.len())]
    }

    /// Entry for a catalog index
    pub fn entry(&self, index: usize) -> Option<&RankedEntry> {
        self.positions.get(index).map(|&p| &self.entries[p])
    }

    /// Rank and score of the entity at catalog index `guess`
    pub fn grade(&self, guess: usize) -> Option<Grade> {
        if Some(guess) == self.target {
            return Some(Grade {
                rank: 1,
                score: TARGET_SCORE,
            });
        }
        let position = *self.positions.get(guess)?;
        Some(Grade {
            rank: position + 1,
            score: self.entries[position].score,
        })
    }

    /// Serializable rows carrying the original attributes of each entity
    pub fn view<'a>(&'a self, catalog: &'a Catalog) -> Vec<RankedView<'a>> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                catalog.get(entry.index).map(|entity| RankedView {
                    rank: position + 1,
                    score: entry.score,
                    display_name: &entry.display_name,
                    entity,
                })
            })
            .collect()
    }
}

/// A ranked entity as handed to front-ends
#[derive(Debug, Clone, Serialize)]
pub struct RankedView<'a> {
    pub rank: usize,
    pub score: u8,
    #[serde(rename = "displayName")]
    pub display_name: &'a str,
    #[serde(flatten)]
    pub entity: &'a Entity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimilarityEngine;
    use serde_json::json;

    fn create_test_catalog() -> Catalog {
        Catalog::from_json_str(
            &json!([
                {"name": "a", "pokedex_number": 1, "koreanName": "에이", "type_1": "fire", "height_m": 1.0},
                {"name": "b", "pokedex_number": 2, "type_1": "fire", "height_m": 1.1},
                {"name": "c", "pokedex_number": 3, "type_1": "water", "height_m": 5.0}
            ])
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_to_score() {
        assert_eq!(to_score(1.0), 100);
        assert_eq!(to_score(0.0), 0);
        assert_eq!(to_score(0.505), 51);
        assert_eq!(to_score(0.494), 49);
        assert_eq!(to_score(1.2), 100);
    }

    #[test]
    fn test_target_first_and_complete() {
        let catalog = create_test_catalog();
        let matrix = SimilarityEngine::compute(&catalog);

        for target in 0..catalog.len() {
            let ranking = Ranking::new(target, &catalog, &matrix);
            assert_eq!(ranking.len(), 3);
            assert_eq!(ranking.entries()[0].index, target);
            assert_eq!(ranking.entries()[0].score, 100);

            let mut seen: Vec<usize> = ranking.entries().iter().map(|e| e.index).collect();
            seen.sort_unstable();
            assert_eq!(seen, vec![0, 1, 2]);
            assert!(ranking.entries()[1..].windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_grade() {
        let catalog = create_test_catalog();
        let matrix = SimilarityEngine::compute(&catalog);
        let ranking = Ranking::new(0, &catalog, &matrix);

        assert_eq!(ranking.grade(0), Some(Grade { rank: 1, score: 100 }));
        assert_eq!(
            ranking.grade(1),
            Some(Grade { rank: 2, score: to_score(matrix.get(1, 0)) })
        );
        assert_eq!(ranking.grade(2).unwrap().rank, 3);
        assert_eq!(ranking.grade(9), None);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        // identical rows give identical scores
        let catalog = Catalog::from_json_str(
            r#"[
                {"name": "t", "pokedex_number": 1, "type_1": "ice", "hp": 10},
                {"name": "x", "pokedex_number": 2, "type_1": "bug", "hp": 50},
                {"name": "y", "pokedex_number": 3, "type_1": "bug", "hp": 50},
                {"name": "z", "pokedex_number": 4, "type_1": "bug", "hp": 50}
            ]"#,
        )
        .unwrap();
        let matrix = SimilarityEngine::compute(&catalog);
        let ranking = Ranking::new(0, &catalog, &matrix);
        let names: Vec<&str> = ranking.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["t", "x", "y", "z"]);
    }

    #[test]
    fn test_invalid_inputs_give_empty_ranking() {
        let catalog = create_test_catalog();
        let matrix = SimilarityEngine::compute(&catalog);
        assert!(Ranking::new(7, &catalog, &matrix).is_empty());

        let empty = Catalog::from_json_str("[]").unwrap();
        let ranking = Ranking::new(0, &empty, &SimilarityEngine::compute(&empty));
        assert!(ranking.is_empty());
        assert_eq!(ranking.grade(0), None);
    }

    #[test]
    fn test_view_serializes_attributes() {
        let catalog = create_test_catalog();
        let matrix = SimilarityEngine::compute(&catalog);
        let ranking = Ranking::new(0, &catalog, &matrix);

        let view = ranking.view(&catalog);
        assert_eq!(view.len(), 3);
        let json = serde_json::to_value(&view[0]).unwrap();
        assert_eq!(json["rank"], 1);
        assert_eq!(json["score"], 100);
        assert_eq!(json["displayName"], "에이");
        assert_eq!(json["name"], "a");
        assert_eq!(json["type_1"], "fire");
        assert_eq!(json["height_m"], 1.0);
    }

    #[test]
    fn test_top() {
        let catalog = create_test_catalog();
        let matrix = SimilarityEngine::compute(&catalog);
        let ranking = Ranking::new(2, &catalog, &matrix);
        assert_eq!(ranking.top(2).len(), 2);
        assert_eq!(ranking.top(10).len(), 3);
        assert_eq!(ranking.entry(2).unwrap().score, 100);
    }
}
