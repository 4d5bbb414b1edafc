use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::keywords::KeywordSet;
use crate::types::{ContentRecord, Label};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupingError {
    #[error("fallback label {0} is also a keyword label")]
    FallbackIsDeclared(Label),
}

/// Identifiers already placed in some collection during one run.
///
/// Passed explicitly into every grouping call so two runs never share state.
#[derive(Debug, Clone, Default)]
pub struct UsedIds(HashSet<String>);

impl UsedIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Marks `id` as used. Returns false when it was already taken.
    pub fn claim(&mut self, id: &str) -> bool {
        if self.0.contains(id) {
            return false;
        }
        self.0.insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<'a> {
    pub label: Label,
    pub records: Vec<&'a ContentRecord>,
}

impl<'a> Group<'a> {
    pub fn new(label: impl Into<Label>) -> Self {
        Self {
            label: label.into(),
            records: Vec::new(),
        }
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grouping<'a> {
    pub groups: Vec<Group<'a>>,
    pub catch_all: Group<'a>,
}

impl<'a> Grouping<'a> {
    pub fn get(&self, label: &str) -> Option<&Group<'a>> {
        self.iter().find(|g| g.label.as_str() == label)
    }

    /// Declared groups followed by the catch-all.
    pub fn iter(&self) -> impl Iterator<Item = &Group<'a>> {
        self.groups.iter().chain(std::iter::once(&self.catch_all))
    }

    pub fn total_items(&self) -> usize {
        self.iter().map(Group::len).sum()
    }

    /// Every distinct input id appears in exactly one group.
    pub fn is_exhaustive_over(&self, records: &[ContentRecord]) -> bool {
        let expected: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let placed: Vec<&str> = self.iter().flat_map(Group::ids).collect();
        let unique: HashSet<&str> = placed.iter().copied().collect();

        unique.len() == placed.len() && unique == expected
    }
}

/// Claims every unused pool record whose title contains any keyword, in pool order.
pub fn assign_to_collection<'a>(
    pool: &[&'a ContentRecord],
    keywords: &[String],
    used: &mut UsedIds,
) -> Vec<&'a ContentRecord> {
    pool.iter()
        .copied()
        .filter(|record| {
            let title = record.title_lower();
            !title.is_empty()
                && keywords.iter().any(|kw| title.contains(kw.as_str()))
                && used.claim(&record.id)
        })
        .collect()
}

/// Unused records in input order; each claimed as it is returned.
pub fn claim_remaining<'a>(
    records: impl IntoIterator<Item = &'a ContentRecord>,
    used: &mut UsedIds,
) -> Vec<&'a ContentRecord> {
    records
        .into_iter()
        .filter(|record| used.claim(&record.id))
        .collect()
}

/// First-label-wins grouping of ordered (label, record) candidates.
///
/// `declared` fixes the output order of groups (empty groups are kept). A
/// candidate whose label was not declared opens a new group at the end.
/// Records never claimed by a candidate land in the `fallback` group, whose
/// label must differ from every group label.
pub fn group_candidates<'a>(
    declared: impl IntoIterator<Item = Label>,
    candidates: impl IntoIterator<Item = (Label, &'a ContentRecord)>,
    records: &'a [ContentRecord],
    fallback: impl Into<Label>,
    used: &mut UsedIds,
) -> Result<Grouping<'a>, GroupingError> {
    let fallback = fallback.into();
    let mut groups: Vec<Group<'a>> = declared.into_iter().map(Group::new).collect();
    let candidates: Vec<(Label, &'a ContentRecord)> = candidates.into_iter().collect();

    if groups
        .iter()
        .map(|g| &g.label)
        .chain(candidates.iter().map(|(label, _)| label))
        .any(|label| *label == fallback)
    {
        return Err(GroupingError::FallbackIsDeclared(fallback));
    }

    for (label, record) in candidates {
        if !used.claim(&record.id) {
            continue;
        }
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.records.push(record),
            None => groups.push(Group {
                label,
                records: vec![record],
            }),
        }
    }

    let catch_all = Group {
        label: fallback,
        records: claim_remaining(records, used),
    };

    Ok(Grouping { groups, catch_all })
}

/// Groups records by keyword set; earlier-declared labels claim contested records.
pub fn group_by_keyword_set<'a>(
    records: &'a [ContentRecord],
    keywords: &KeywordSet,
    fallback: impl Into<Label>,
    used: &mut UsedIds,
) -> Result<Grouping<'a>, GroupingError> {
    let titles: Vec<String> = records.iter().map(ContentRecord::title_lower).collect();

    let candidates = keywords.rules().iter().flat_map(|rule| {
        records
            .iter()
            .zip(titles.iter())
            .filter(move |(_, title)| !title.is_empty() && rule.matches(title))
            .map(move |(record, _)| (rule.label.clone(), record))
    });

    group_candidates(
        keywords.labels().cloned(),
        candidates,
        records,
        fallback,
        used,
    )
}
