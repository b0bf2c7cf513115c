//! Resolving free-text guesses against the catalog

use pokemantle_core::{Catalog, Entity};

/// Catalog index of the entity named by `input`
///
/// Matches the display name exactly, or the key against the lowercased
/// input. The first match in catalog order wins.
pub fn match_guess(input: &str, catalog: &Catalog) -> Option<usize> {
    if input.is_empty() {
        return None;
    }
    let lowered = input.to_lowercase();
    catalog
        .iter()
        .position(|entity| entity.display_name() == input || entity.name == lowered)
}

/// Up to `limit` entities whose display name contains `input` or whose key
/// contains the lowercased input, in catalog order
pub fn suggest<'a>(input: &str, catalog: &'a Catalog, limit: usize) -> Vec<&'a Entity> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }
    let lowered = input.to_lowercase();
    catalog
        .iter()
        .filter(|entity| entity.display_name().contains(input) || entity.name.contains(&lowered))
        .take(limit)
        .collect()
}
