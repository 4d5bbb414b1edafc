use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::types::Label;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeywordSetError {
    #[error("duplicate label in keyword set: {0}")]
    DuplicateLabel(Label),
    #[error("label {0} has no keywords")]
    EmptyRule(Label),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub label: Label,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(label: impl Into<Label>, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            label: label.into(),
            keywords: normalize_keywords(keywords),
        }
    }

    /// Keywords of this rule contained in an already lowercased title.
    pub fn matches_in(&self, title_lower: &str) -> Vec<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .filter(|kw| title_lower.contains(kw))
            .collect()
    }

    pub fn matches(&self, title_lower: &str) -> bool {
        self.keywords.iter().any(|kw| title_lower.contains(kw.as_str()))
    }
}

/// Ordered label -> keywords table. Declaration order is the priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordSet {
    rules: Vec<KeywordRule>,
}

impl KeywordSet {
    pub fn new(rules: Vec<KeywordRule>) -> Result<Self, KeywordSetError> {
        let mut seen = HashSet::new();
        rules.iter().try_for_each(|rule| {
            if !seen.insert(rule.label.clone()) {
                return Err(KeywordSetError::DuplicateLabel(rule.label.clone()));
            }
            if rule.keywords.is_empty() {
                return Err(KeywordSetError::EmptyRule(rule.label.clone()));
            }
            Ok(())
        })?;
        Ok(Self { rules })
    }

    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Result<Self, KeywordSetError> {
        Self::new(
            pairs
                .iter()
                .map(|(label, keywords)| KeywordRule::new(*label, keywords.iter().copied()))
                .collect(),
        )
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.rules.iter().map(|r| &r.label)
    }

    pub fn get(&self, label: &str) -> Option<&KeywordRule> {
        self.rules.iter().find(|r| r.label.as_str() == label)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn keyword_count(&self) -> usize {
        self.rules.iter().map(|r| r.keywords.len()).sum()
    }
}

impl<'de> Deserialize<'de> for KeywordSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rules = Vec::<KeywordRule>::deserialize(deserializer)?
            .into_iter()
            .map(|r| KeywordRule::new(r.label, r.keywords))
            .collect();
        Self::new(rules).map_err(serde::de::Error::custom)
    }
}

/// Lowercase, drop blanks and repeats; first occurrence keeps its position.
pub fn normalize_keywords(keywords: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| k.into().to_lowercase())
        .filter(|k| !k.trim().is_empty())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}
