use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use space_tree_core::{ContentRecord, SpaceStructure};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MappingStats {
    pub mapped: usize,
    pub total: usize,
    pub unmapped: usize,
}

/// Upstream file URLs keyed by record id, sorted so fuzzy lookups are stable.
fn url_index(upstream: &[ContentRecord]) -> BTreeMap<&str, &str> {
    upstream
        .iter()
        .filter(|r| !r.id.is_empty() && !r.file_url.is_empty())
        .fold(BTreeMap::new(), |mut index, record| {
            index.entry(record.id.as_str()).or_insert(record.file_url.as_str());
            index
        })
}

fn find_containing<'u>(index: &BTreeMap<&str, &'u str>, fragment: &str) -> Option<&'u str> {
    if fragment.is_empty() {
        return None;
    }
    index
        .iter()
        .find(|(id, _)| id.contains(fragment))
        .map(|(_, url)| *url)
}

fn lookup<'u>(index: &BTreeMap<&str, &'u str>, id: &str) -> Option<&'u str> {
    if let Some(url) = index.get(id).copied() {
        return Some(url);
    }
    if let Some((_, tail)) = id.split_once('_') {
        if let Some(url) = find_containing(index, tail) {
            return Some(url);
        }
    }
    if let Some((base, _)) = id.split_once('.') {
        if let Some(url) = find_containing(index, base) {
            return Some(url);
        }
    }
    None
}

/// Points every item's `fileUrl` at the upstream file for the same content.
///
/// Items are matched by exact id, then by the part after the first `_`, then
/// by the part before the first `.`. Unmatched items fall back to their own id.
pub fn map_file_urls(structure: &mut SpaceStructure, upstream: &[ContentRecord]) -> MappingStats {
    let index = url_index(upstream);

    structure
        .items_mut()
        .fold(MappingStats::default(), |mut stats, item| {
            stats.total += 1;
            match lookup(&index, &item.id) {
                Some(url) => {
                    item.file_url = url.to_string();
                    stats.mapped += 1;
                }
                None => {
                    warn!(id = %item.id, "no file URL found");
                    item.file_url = item.id.clone();
                    stats.unmapped += 1;
                }
            }
            stats
        })
}
