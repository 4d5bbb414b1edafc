use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use space_tree_core::{
    classify_title, structure_fingerprint, ContentType, Grouping, Label, SpaceStructure,
};

use crate::taxonomy::Taxonomy;

/// Pretty-printed JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)
}

/// One group of a flat grouping, as written to JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub label: Label,
    pub ids: Vec<String>,
}

pub fn grouping_summary(grouping: &Grouping<'_>) -> Vec<GroupSummary> {
    grouping
        .iter()
        .map(|group| GroupSummary {
            label: group.label.clone(),
            ids: group.ids().into_iter().map(String::from).collect(),
        })
        .collect()
}

pub fn format_grouping(grouping: &Grouping<'_>) -> String {
    let mut output = format!("{} item(s) grouped:\n\n", grouping.total_items());

    for group in grouping.iter() {
        output.push_str(&format!("{} ({})\n", group.label, group.len()));
        for record in &group.records {
            output.push_str(&format!("  - {} {}\n", record.id, record.title));
        }
    }

    output
}

pub fn format_structure_summary(structure: &SpaceStructure) -> String {
    let summary = &structure.analysis_summary;
    let mut output = format!(
        "{} card(s), {} collection(s), {}/{} item(s) placed\n\n",
        summary.categories_created,
        summary.collections_created,
        summary.total_items_included,
        summary.total_items_analyzed
    );

    for card in &structure.space_cards {
        output.push_str(&format!(
            "{} [{}] {} item(s)\n",
            card.title, card.priority, card.content_count
        ));
        for collection in &card.collections {
            output.push_str(&format!("  {}: {}\n", collection.title, collection.total_count));
        }
    }

    if let Ok(fingerprint) = structure_fingerprint(structure) {
        output.push_str(&format!("\nFingerprint: {}", fingerprint));
    }

    output
}

fn type_distribution(structure: &SpaceStructure) -> BTreeMap<&'static str, usize> {
    structure.items().fold(BTreeMap::new(), |mut acc, item| {
        *acc.entry(item.content_type.as_str()).or_insert(0) += 1;
        acc
    })
}

fn specialty_distribution(structure: &SpaceStructure) -> Vec<(&str, usize)> {
    let counts = structure.items().fold(BTreeMap::new(), |mut acc, item| {
        *acc.entry(item.specialty.as_str()).or_insert(0usize) += 1;
        acc
    });
    sorted_by_count(counts)
}

fn procedure_counts<'t>(structure: &SpaceStructure, taxonomy: &'t Taxonomy) -> Vec<(&'t str, usize)> {
    let counts = structure
        .items()
        .flat_map(|item| classify_title(&item.title, &taxonomy.procedures).labels)
        .fold(BTreeMap::<String, usize>::new(), |mut acc, label| {
            *acc.entry(label.into_string()).or_insert(0) += 1;
            acc
        });

    let ranked = taxonomy
        .procedures
        .labels()
        .filter_map(|label| counts.get(label.as_str()).map(|n| (label.as_str(), *n)))
        .collect::<Vec<_>>();
    sorted_by_count(ranked)
}

fn sorted_by_count<'a>(counts: impl IntoIterator<Item = (&'a str, usize)>) -> Vec<(&'a str, usize)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Markdown overview of a structure for human review.
///
/// The run time appears only here; the structure file itself carries none.
pub fn render_markdown(
    structure: &SpaceStructure,
    taxonomy: &Taxonomy,
    generated_at: DateTime<Utc>,
) -> String {
    let summary = &structure.analysis_summary;
    let mut md = String::from("# Space Structure Report\n\n");
    md.push_str(&format!(
        "Generated: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Items analyzed: {}\n", summary.total_items_analyzed));
    md.push_str(&format!("- Items placed: {}\n", summary.total_items_included));
    md.push_str(&format!("- Cards: {}\n", summary.categories_created));
    md.push_str(&format!("- Collections: {}\n", summary.collections_created));
    if let Some(version) = structure.taxonomy_version {
        md.push_str(&format!("- Taxonomy version: {}\n", version));
    }

    md.push_str("\n## Cards\n\n");
    md.push_str("| Card | Priority | Items | Collections |\n");
    md.push_str("|------|----------|-------|-------------|\n");
    for card in &structure.space_cards {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            card.title,
            card.priority,
            card.content_count,
            card.collections.len()
        ));
    }

    for card in &structure.space_cards {
        md.push_str(&format!("\n### {}\n\n{}\n\n", card.title, card.description));
        for collection in &card.collections {
            md.push_str(&format!(
                "- **{}** ({}): {}\n",
                collection.title, collection.total_count, collection.description
            ));
        }
    }

    md.push_str("\n## Content Types\n\n");
    let types = type_distribution(structure);
    for content_type in ContentType::ALL {
        if let Some(count) = types.get(content_type.as_str()) {
            md.push_str(&format!("- {}: {}\n", content_type, count));
        }
    }

    md.push_str("\n## Specialties\n\n");
    for (specialty, count) in specialty_distribution(structure) {
        md.push_str(&format!("- {}: {}\n", specialty, count));
    }

    let procedures = procedure_counts(structure, taxonomy);
    if !procedures.is_empty() {
        md.push_str("\n## Procedures\n\n");
        for (procedure, count) in procedures {
            md.push_str(&format!("- {}: {}\n", procedure, count));
        }
    }

    md
}
