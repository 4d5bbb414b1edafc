use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::structure::SpaceStructure;
use crate::types::ContentRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoverageError {
    #[error("records missing from structure: {}", .0.join(", "))]
    Missing(Vec<String>),
    #[error("records placed more than once: {}", .0.join(", "))]
    Duplicated(Vec<String>),
    #[error("structure holds unknown records: {}", .0.join(", "))]
    Unknown(Vec<String>),
}

/// Recomputes every count from the collections themselves.
///
/// `total_items_analyzed` is left alone: it describes the input, not the output.
pub fn reconcile_counts(structure: &mut SpaceStructure) {
    let mut total = 0;
    let mut collections = 0;

    for card in &mut structure.space_cards {
        let mut card_total = 0;
        for collection in &mut card.collections {
            collection.total_count = collection.items.len();
            card_total += collection.total_count;
        }
        card.content_count = card_total;
        collections += card.collections.len();
        total += card_total;
    }

    structure.total_content = total;
    structure.analysis_summary.total_items_included = total;
    structure.analysis_summary.categories_created = structure.space_cards.len();
    structure.analysis_summary.collections_created = collections;
}

/// Checks that every distinct record id appears in exactly one collection.
pub fn verify_coverage(
    structure: &SpaceStructure,
    records: &[ContentRecord],
) -> Result<(), CoverageError> {
    let expected: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();

    let placements = structure
        .items()
        .fold(HashMap::<&str, usize>::new(), |mut acc, item| {
            *acc.entry(item.id.as_str()).or_default() += 1;
            acc
        });

    let sorted = |ids: Vec<&str>| -> Vec<String> {
        let mut ids: Vec<String> = ids.into_iter().map(String::from).collect();
        ids.sort();
        ids
    };

    let duplicated = sorted(
        placements
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(&id, _)| id)
            .collect(),
    );
    if !duplicated.is_empty() {
        return Err(CoverageError::Duplicated(duplicated));
    }

    let missing = sorted(
        expected
            .iter()
            .copied()
            .filter(|id| !placements.contains_key(id))
            .collect(),
    );
    if !missing.is_empty() {
        return Err(CoverageError::Missing(missing));
    }

    let unknown = sorted(
        placements
            .keys()
            .copied()
            .filter(|id| !expected.contains(id))
            .collect(),
    );
    if !unknown.is_empty() {
        return Err(CoverageError::Unknown(unknown));
    }

    Ok(())
}
