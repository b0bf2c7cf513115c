// Integration tests for Pokemantle
use pokemantle::prelude::*;
use pokemantle::SimilarityBreakdown;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

fn scenario_catalog() -> Catalog {
    Catalog::from_json_str(
        &json!([
            {"name": "a", "pokedex_number": 1, "koreanName": "A", "type_1": "fire", "height_m": 1.0},
            {"name": "b", "pokedex_number": 2, "koreanName": "B", "type_1": "fire", "height_m": 1.1},
            {"name": "c", "pokedex_number": 3, "koreanName": "C", "type_1": "water", "height_m": 5.0}
        ])
        .to_string(),
    )
    .unwrap()
}

fn starter_catalog() -> Catalog {
    Catalog::from_json_str(
        &json!([
            {"name": "bulbasaur", "pokedex_number": 1, "koreanName": "이상해씨", "generation": 1,
             "type_1": "Grass", "type_2": "Poison", "ability_1": "Overgrow", "ability_hidden": "Chlorophyll",
             "growth_rate": "Medium Slow", "egg_type_1": "Grass", "egg_type_2": "Monster",
             "height_m": 0.7, "weight_kg": 6.9, "hp": 45, "attack": 49, "defense": 49,
             "sp_attack": 65, "sp_defense": 65, "speed": 45, "total_points": 318,
             "against_fire": 2.0, "against_water": 0.5},
            {"name": "ivysaur", "pokedex_number": 2, "koreanName": "이상해풀", "generation": 1,
             "type_1": "Grass", "type_2": "Poison", "ability_1": "Overgrow", "ability_hidden": "Chlorophyll",
             "growth_rate": "Medium Slow", "egg_type_1": "Grass", "egg_type_2": "Monster",
             "height_m": 1.0, "weight_kg": 13.0, "hp": 60, "attack": 62, "defense": 63,
             "sp_attack": 80, "sp_defense": 80, "speed": 60, "total_points": 405,
             "against_fire": 2.0, "against_water": 0.5},
            {"name": "charmander", "pokedex_number": 4, "koreanName": "파이리", "generation": 1,
             "type_1": "Fire", "ability_1": "Blaze", "ability_hidden": "Solar Power",
             "growth_rate": "Medium Slow", "egg_type_1": "Dragon", "egg_type_2": "Monster",
             "height_m": 0.6, "weight_kg": 8.5, "hp": 39, "attack": 52, "defense": 43,
             "sp_attack": 60, "sp_defense": 50, "speed": 65, "total_points": 309,
             "against_fire": 0.5, "against_water": 2.0},
            {"name": "squirtle", "pokedex_number": 7, "koreanName": "꼬부기", "generation": 1,
             "type_1": "Water", "ability_1": "Torrent", "ability_hidden": "Rain Dish",
             "growth_rate": "Medium Slow", "egg_type_1": "Monster", "egg_type_2": "Water 1",
             "height_m": 0.5, "weight_kg": 9.0, "hp": 44, "attack": 48, "defense": 65,
             "sp_attack": 50, "sp_defense": 64, "speed": 43, "total_points": 314,
             "against_fire": 0.5, "against_water": 0.5},
            {"name": "pikachu", "pokedex_number": 25, "koreanName": "피카츄", "generation": 1,
             "type_1": "Electric", "ability_1": "Static", "ability_hidden": "Lightning Rod",
             "growth_rate": "Medium Fast", "egg_type_1": "Field", "egg_type_2": "Fairy",
             "height_m": 0.4, "weight_kg": 6.0, "hp": 35, "attack": 55, "defense": 40,
             "sp_attack": 50, "sp_defense": 50, "speed": 90, "total_points": 320,
             "against_fire": 1.0, "against_water": 1.0}
        ])
        .to_string(),
    )
    .unwrap()
}

#[test]
fn test_shared_type_ranks_higher() {
    let catalog = scenario_catalog();
    let matrix = SimilarityEngine::compute(&catalog);
    assert!(matrix.get(1, 0) > matrix.get(2, 0));

    let ranking = Ranking::new(0, &catalog, &matrix);
    let names: Vec<&str> = ranking.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_grade_scenario() {
    let catalog = scenario_catalog();
    let matrix = SimilarityEngine::compute(&catalog);
    let ranking = Ranking::new(0, &catalog, &matrix);

    let guess = match_guess("B", &catalog).unwrap();
    assert_eq!(guess, 1);

    let grade = ranking.grade(guess).unwrap();
    assert_eq!(grade.rank, 2);
    assert_eq!(grade.score as f64, (matrix.get(1, 0) * 100.0).round());
}

#[test]
fn test_unknown_guess() {
    let catalog = Arc::new(scenario_catalog());
    let matrix = SimilarityEngine::compute(&catalog);
    let mut session = GameSession::with_target_name(Arc::clone(&catalog), &matrix, "a").unwrap();

    assert_eq!(match_guess("Missingno", &catalog), None);
    assert_eq!(
        session.submit("Missingno"),
        Err(GuessError::NotFound("Missingno".to_string()))
    );
    assert!(session.history().is_empty());
    assert_eq!(session.attempts(), 0);
}

#[test]
fn test_matrix_properties() {
    let catalog = starter_catalog();
    let matrix = SimilarityEngine::compute(&catalog);

    assert_eq!(matrix.len(), catalog.len());
    assert!(matrix.is_symmetric());
    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), 1.0);
        for j in 0..matrix.len() {
            let v = matrix.get(i, j);
            assert!((0.0..=1.0).contains(&v), "m[{}][{}] = {}", i, j, v);
        }
    }

    // ivysaur is bulbasaur's nearest neighbour
    let ranking = Ranking::new(0, &catalog, &matrix);
    assert_eq!(ranking.entries()[1].name, "ivysaur");
}

#[test]
fn test_deterministic() {
    let catalog = starter_catalog();
    let first = SimilarityEngine::compute(&catalog);
    let second = SimilarityEngine::compute(&Catalog::from_json_str(
        &serde_json::to_string(catalog.entities()).unwrap(),
    )
    .unwrap());

    for i in 0..first.len() {
        for j in 0..first.len() {
            assert_eq!(first.get(i, j).to_bits(), second.get(i, j).to_bits());
        }
    }
}

#[test]
fn test_ranking_is_complete() {
    let catalog = starter_catalog();
    let matrix = SimilarityEngine::compute(&catalog);

    for target in 0..catalog.len() {
        let ranking = Ranking::new(target, &catalog, &matrix);
        assert_eq!(ranking.len(), catalog.len());
        assert_eq!(ranking.entries()[0].index, target);
        assert_eq!(ranking.entries()[0].score, 100);

        let mut indices: Vec<usize> = ranking.entries().iter().map(|e| e.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..catalog.len()).collect::<Vec<_>>());

        for (position, entry) in ranking.entries().iter().enumerate().skip(1) {
            let grade = ranking.grade(entry.index).unwrap();
            assert_eq!(grade.rank, position + 1);
            assert!(grade.score <= 100);
        }
    }
}

#[test]
fn test_single_entity_catalog() {
    let catalog = Catalog::from_json_str(r#"[{"name": "mew", "pokedex_number": 151, "type_1": "Psychic"}]"#).unwrap();
    let matrix = SimilarityEngine::compute(&catalog);
    assert_eq!(matrix.to_rows(), vec![vec![1.0]]);
}

#[test]
fn test_empty_catalog() {
    let catalog = Catalog::from_json_str("[]").unwrap();
    let matrix = SimilarityEngine::compute(&catalog);
    assert!(matrix.is_empty());
    assert!(Ranking::new(0, &catalog, &matrix).is_empty());
}

#[test]
fn test_full_round() {
    let catalog = Arc::new(starter_catalog());
    let cache = SimilarityCache::new();
    let matrix = cache.get_or_compute(&catalog);
    let mut session = GameSession::with_target_name(Arc::clone(&catalog), &matrix, "squirtle").unwrap();

    let first = session.submit("pikachu").unwrap();
    let second = session.submit("파이리").unwrap();
    let repeat = session.submit("PIKACHU").unwrap();
    assert!(matches!(first, GuessOutcome::Ranked(_)));
    assert!(matches!(second, GuessOutcome::Ranked(_)));
    assert_eq!(repeat, GuessOutcome::Repeated(first.record().clone()));
    assert_eq!(session.attempts(), 2);
    assert_eq!(session.display_order()[0].name, "pikachu");

    let solved = session.submit("꼬부기").unwrap();
    assert!(solved.is_solved());
    assert_eq!(session.state(), RoundState::Solved { attempt: 3 });
    assert_eq!(session.submit("pikachu"), Err(GuessError::RoundOver));
}

#[test]
fn test_catalog_from_file_and_cache() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string(starter_catalog().entities()).unwrap()).unwrap();

    let config = GameConfig::new(file.path());
    let loaded = config.load_catalog().unwrap();
    let original = starter_catalog();
    assert_eq!(loaded.fingerprint(), original.fingerprint());

    let cache = SimilarityCache::new();
    let a = cache.get_or_compute(&loaded);
    let b = cache.get_or_compute(&original);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_explain_pair() {
    let catalog = starter_catalog();
    let engine = SimilarityEngine::fit(&catalog);
    let matrix = engine.similarity_matrix();

    let breakdown: SimilarityBreakdown = engine.explain(&matrix, 1, 0).unwrap();
    assert_eq!(breakdown.blended, matrix.get(1, 0));
    assert!(breakdown.shared_categories.contains(&"types:grass".to_string()));
    assert!(breakdown.shared_categories.contains(&"abilities:Overgrow".to_string()));
}
