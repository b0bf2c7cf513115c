//! One round of the guessing game
//!
//! A session owns the target, the ranking against it and the guess history.
//! The catalog and matrix are shared read-only between sessions.

use crate::matcher::match_guess;
use pokemantle_core::{Catalog, Entity, Error, Result};
use pokemantle_similarity::{Ranking, SimilarityMatrix, TARGET_SCORE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Why a guess was not accepted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("No entity matches \"{0}\"")]
    NotFound(String),

    #[error("The round is already over")]
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RoundState {
    AwaitingInput,
    /// Target guessed on attempt `attempt`
    Solved { attempt: u32 },
    /// Player gave up
    Revealed,
}

/// One line of the guess history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuessRecord {
    pub index: usize,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub rank: usize,
    pub score: u8,
    /// Attempt that first produced this guess; `None` for a revealed solution
    pub attempt: Option<u32>,
}

/// Result of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// A new wrong guess
    Ranked(GuessRecord),
    /// A guess already in the history; no attempt consumed
    Repeated(GuessRecord),
    Solved(GuessRecord),
}

impl GuessOutcome {
    pub fn record(&self) -> &GuessRecord {
        match self {
            GuessOutcome::Ranked(record)
            | GuessOutcome::Repeated(record)
            | GuessOutcome::Solved(record) => record,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, GuessOutcome::Solved(_))
    }
}

pub struct GameSession {
    catalog: Arc<Catalog>,
    ranking: Ranking,
    target: usize,
    history: Vec<GuessRecord>,
    attempts: u32,
    state: RoundState,
    solution: Option<GuessRecord>,
    /// Catalog index of the most recent accepted guess
    latest: Option<usize>,
}

impl GameSession {
    /// Start a round with the entity at `target` as the answer
    pub fn new(catalog: Arc<Catalog>, matrix: &SimilarityMatrix, target: usize) -> Result<Self> {
        if matrix.len() != catalog.len() {
            return Err(Error::InvalidConfig(format!(
                "similarity matrix has {} rows but the catalog has {} entities",
                matrix.len(),
                catalog.len()
            )));
        }
        if target >= catalog.len() {
            return Err(Error::EntityNotFound(format!("#{}", target)));
        }

        let ranking = Ranking::new(target, &catalog, matrix);
        debug!(target_index = target, entities = ranking.len(), "round started");
        Ok(Self {
            catalog,
            ranking,
            target,
            history: Vec::new(),
            attempts: 0,
            state: RoundState::AwaitingInput,
            solution: None,
            latest: None,
        })
    }

    /// Start a round with the entity keyed `name` as the answer
    pub fn with_target_name(
        catalog: Arc<Catalog>,
        matrix: &SimilarityMatrix,
        name: &str,
    ) -> Result<Self> {
        let target = catalog.require(name)?;
        Self::new(catalog, matrix, target)
    }

    /// Start a round with a random target; a seed makes the choice reproducible
    pub fn random(catalog: Arc<Catalog>, matrix: &SimilarityMatrix, seed: Option<u64>) -> Result<Self> {
        if catalog.is_empty() {
            return Err(Error::InvalidConfig(
                "cannot start a round on an empty catalog".to_string(),
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let target = rng.random_range(0..catalog.len());
        Self::new(catalog, matrix, target)
    }

    /// Resolve `input` and grade it against the target
    pub fn submit(&mut self, input: &str) -> std::result::Result<GuessOutcome, GuessError> {
        if self.is_over() {
            return Err(GuessError::RoundOver);
        }
        let index = match_guess(input, &self.catalog)
            .ok_or_else(|| GuessError::NotFound(input.to_string()))?;

        if index == self.target {
            self.attempts += 1;
            let record = self.record(index, Some(self.attempts));
            self.state = RoundState::Solved {
                attempt: self.attempts,
            };
            self.solution = Some(record.clone());
            self.latest = Some(index);
            info!(attempts = self.attempts, "target guessed");
            return Ok(GuessOutcome::Solved(record));
        }

        self.latest = Some(index);
        if let Some(existing) = self.history.iter_mut().find(|r| r.index == index) {
            if let Some(grade) = self.ranking.grade(index) {
                existing.rank = grade.rank;
                existing.score = grade.score;
            }
            return Ok(GuessOutcome::Repeated(existing.clone()));
        }

        self.attempts += 1;
        let record = self.record(index, Some(self.attempts));
        debug!(guess = %record.name, rank = record.rank, score = record.score, "guess graded");
        self.history.push(record.clone());
        Ok(GuessOutcome::Ranked(record))
    }

    /// Give up and expose the target
    pub fn reveal(&mut self) -> std::result::Result<&GuessRecord, GuessError> {
        if self.is_over() {
            return Err(GuessError::RoundOver);
        }
        self.state = RoundState::Revealed;
        let record = self.record(self.target, None);
        info!(answer = %record.name, attempts = self.attempts, "target revealed");
        Ok(self.solution.insert(record))
    }

    fn record(&self, index: usize, attempt: Option<u32>) -> GuessRecord {
        let (rank, score) = if index == self.target {
            (1, TARGET_SCORE)
        } else {
            self.ranking
                .grade(index)
                .map_or((0, 0), |grade| (grade.rank, grade.score))
        };
        let (name, display_name) = self
            .catalog
            .get(index)
            .map(|e| (e.name.clone(), e.display_name().to_string()))
            .unwrap_or_default();
        GuessRecord {
            index,
            name,
            display_name,
            rank,
            score,
            attempt,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state != RoundState::AwaitingInput
    }

    /// Attempts consumed so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Wrong guesses in submission order
    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    /// The target record once the round is over
    pub fn solution(&self) -> Option<&GuessRecord> {
        self.solution.as_ref()
    }

    /// History for display: the latest guess first, the rest by ascending rank
    pub fn display_order(&self) -> Vec<&GuessRecord> {
        let latest = self
            .latest
            .and_then(|index| self.history.iter().find(|r| r.index == index));
        let mut rest: Vec<&GuessRecord> = self
            .history
            .iter()
            .filter(|r| Some(r.index) != latest.map(|l| l.index))
            .collect();
        rest.sort_by_key(|r| r.rank);
        latest.into_iter().chain(rest).collect()
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Only meaningful to front-ends once the round is over
    pub fn target(&self) -> Option<&Entity> {
        self.catalog.get(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokemantle_similarity::SimilarityEngine;
    use serde_json::json;

    fn create_test_session(target: &str) -> GameSession {
        let catalog = Catalog::from_json_str(
            &json!([
                {"name": "a", "pokedex_number": 1, "type_1": "fire", "height_m": 1.0},
                {"name": "b", "pokedex_number": 2, "type_1": "fire", "height_m": 1.1},
                {"name": "c", "pokedex_number": 3, "type_1": "water", "height_m": 5.0},
                {"name": "d", "pokedex_number": 4, "type_1": "water", "height_m": 4.0}
            ])
            .to_string(),
        )
        .unwrap();
        let matrix = SimilarityEngine::compute(&catalog);
        GameSession::with_target_name(Arc::new(catalog), &matrix, target).unwrap()
    }

    #[test]
    fn test_wrong_guess_is_ranked() {
        let mut session = create_test_session("a");
        let outcome = session.submit("b").unwrap();

        let record = match outcome {
            GuessOutcome::Ranked(record) => record,
            other => panic!("expected a ranked guess, got {:?}", other),
        };
        assert_eq!(record.rank, 2);
        assert_eq!(record.attempt, Some(1));
        assert_eq!(session.attempts(), 1);
        assert_eq!(session.state(), RoundState::AwaitingInput);
    }

    #[test]
    fn test_unknown_guess_leaves_history() {
        let mut session = create_test_session("a");
        session.submit("c").unwrap();

        let err = session.submit("Missingno").unwrap_err();
        assert_eq!(err, GuessError::NotFound("Missingno".to_string()));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn test_reguess_is_idempotent() {
        let mut session = create_test_session("a");
        session.submit("c").unwrap();
        session.submit("b").unwrap();
        let before = session.history().to_vec();

        let outcome = session.submit("C").unwrap();
        assert!(matches!(outcome, GuessOutcome::Repeated(_)));
        assert_eq!(outcome.record().attempt, Some(1));
        assert_eq!(session.history(), before.as_slice());
        assert_eq!(session.attempts(), 2);
    }

    #[test]
    fn test_solve() {
        let mut session = create_test_session("a");
        session.submit("c").unwrap();
        let outcome = session.submit("a").unwrap();

        assert!(outcome.is_solved());
        assert_eq!(outcome.record().score, 100);
        assert_eq!(outcome.record().rank, 1);
        assert_eq!(session.state(), RoundState::Solved { attempt: 2 });
        assert_eq!(session.solution().unwrap().attempt, Some(2));
        assert_eq!(session.submit("b"), Err(GuessError::RoundOver));
    }

    #[test]
    fn test_reveal() {
        let mut session = create_test_session("d");
        session.submit("a").unwrap();

        let solution = session.reveal().unwrap().clone();
        assert_eq!(solution.name, "d");
        assert_eq!(solution.attempt, None);
        assert_eq!(solution.score, 100);
        assert_eq!(session.state(), RoundState::Revealed);
        assert_eq!(session.attempts(), 1);
        assert_eq!(session.submit("d"), Err(GuessError::RoundOver));
        assert!(session.reveal().is_err());
    }

    #[test]
    fn test_display_order() {
        let mut session = create_test_session("a");
        session.submit("b").unwrap();
        session.submit("d").unwrap();
        session.submit("c").unwrap();

        let ranks: Vec<usize> = session.display_order().iter().map(|r| r.rank).collect();
        let latest = session.history().iter().find(|r| r.name == "c").unwrap().rank;
        assert_eq!(ranks[0], latest);
        assert!(ranks[1..].windows(2).all(|w| w[0] <= w[1]));

        // a repeat moves the entry to the front without duplicating it
        session.submit("b").unwrap();
        let names: Vec<&str> = session
            .display_order()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names[0], "b");
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_random_is_reproducible() {
        let catalog = Arc::new(
            Catalog::from_json_str(
                r#"[{"name": "x", "pokedex_number": 1}, {"name": "y", "pokedex_number": 2},
                    {"name": "z", "pokedex_number": 3}]"#,
            )
            .unwrap(),
        );
        let matrix = SimilarityEngine::compute(&catalog);
        let first = GameSession::random(Arc::clone(&catalog), &matrix, Some(42)).unwrap();
        let second = GameSession::random(Arc::clone(&catalog), &matrix, Some(42)).unwrap();
        assert_eq!(first.target().unwrap().name, second.target().unwrap().name);
    }

    #[test]
    fn test_invalid_rounds() {
        let empty = Arc::new(Catalog::from_json_str("[]").unwrap());
        let matrix = SimilarityEngine::compute(&empty);
        assert!(GameSession::random(Arc::clone(&empty), &matrix, Some(1)).is_err());

        let catalog = Arc::new(Catalog::from_json_str(r#"[{"name": "x", "pokedex_number": 1}]"#).unwrap());
        assert!(matches!(
            GameSession::new(Arc::clone(&catalog), &matrix, 0),
            Err(Error::InvalidConfig(_))
        ));
        let matrix = SimilarityEngine::compute(&catalog);
        assert!(matches!(
            GameSession::with_target_name(catalog, &matrix, "y"),
            Err(Error::EntityNotFound(_))
        ));
    }
}
