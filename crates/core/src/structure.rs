use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ContentRecord, ContentType, Label, Urgency};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Highest,
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Highest => "highest",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

/// A record as it appears inside an output collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub specialty: Label,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub file_url: String,
}

impl ContentItem {
    pub fn from_record(record: &ContentRecord, specialty: Label, urgency: Urgency) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            content_type: record.content_type,
            specialty,
            urgency,
            file_url: if record.file_url.is_empty() {
                record.id.clone()
            } else {
                record.file_url.clone()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCollection {
    pub id: String,
    pub title: String,
    pub description: String,
    pub items: Vec<ContentItem>,
    #[serde(default)]
    pub total_count: usize,
}

impl CardCollection {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        items: Vec<ContentItem>,
    ) -> Self {
        let total_count = items.len();
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            items,
            total_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceCard {
    pub id: String,
    pub title: String,
    pub color: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub content_count: usize,
    pub collections: Vec<CardCollection>,
}

impl SpaceCard {
    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.collections.iter().flat_map(|c| c.items.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSummary {
    pub total_items_analyzed: usize,
    pub total_items_included: usize,
    pub categories_created: usize,
    pub collections_created: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceStructure {
    pub space_cards: Vec<SpaceCard>,
    pub total_content: usize,
    pub analysis_summary: StructureSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy_version: Option<u32>,
}

impl SpaceStructure {
    pub fn new(space_cards: Vec<SpaceCard>) -> Self {
        Self {
            space_cards,
            total_content: 0,
            analysis_summary: StructureSummary::default(),
            taxonomy_version: None,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.space_cards.iter().flat_map(SpaceCard::items)
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut ContentItem> {
        self.space_cards
            .iter_mut()
            .flat_map(|card| card.collections.iter_mut())
            .flat_map(|collection| collection.items.iter_mut())
    }

    pub fn card(&self, id: &str) -> Option<&SpaceCard> {
        self.space_cards.iter().find(|c| c.id == id)
    }

    pub fn collection(&self, id: &str) -> Option<&CardCollection> {
        self.space_cards
            .iter()
            .flat_map(|c| c.collections.iter())
            .find(|c| c.id == id)
    }
}
