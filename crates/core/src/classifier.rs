use serde::Serialize;

use crate::keywords::KeywordSet;
use crate::types::Label;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Matched labels in keyword-set declaration order.
    pub labels: Vec<Label>,
    pub matched_keywords: Vec<String>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn first(&self) -> Option<&Label> {
        self.labels.first()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.as_str() == label)
    }
}

pub trait Classifier {
    fn classify(&self, title: &str) -> Classification;

    fn fallback(&self) -> &Label;

    /// Single-label view: first match in declaration order, else the fallback.
    fn primary_label(&self, title: &str) -> Label {
        self.classify(title)
            .labels
            .into_iter()
            .next()
            .unwrap_or_else(|| self.fallback().clone())
    }
}

/// Case-insensitive substring matcher. No tokenization: "ecmo" also hits "pseudoecmo".
#[derive(Debug, Clone)]
pub struct SubstringClassifier {
    keywords: KeywordSet,
    fallback: Label,
}

impl SubstringClassifier {
    pub fn new(keywords: KeywordSet, fallback: impl Into<Label>) -> Self {
        Self {
            keywords,
            fallback: fallback.into(),
        }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }
}

impl Classifier for SubstringClassifier {
    fn classify(&self, title: &str) -> Classification {
        classify_title(title, &self.keywords)
    }

    fn fallback(&self) -> &Label {
        &self.fallback
    }
}

pub fn classify_title(title: &str, keywords: &KeywordSet) -> Classification {
    if title.is_empty() {
        return Classification::default();
    }

    let title_lower = title.to_lowercase();

    keywords
        .rules()
        .iter()
        .map(|rule| (rule, rule.matches_in(&title_lower)))
        .filter(|(_, hits)| !hits.is_empty())
        .fold(Classification::default(), |mut acc, (rule, hits)| {
            acc.labels.push(rule.label.clone());
            acc.matched_keywords
                .extend(hits.into_iter().map(String::from));
            acc
        })
}

pub fn label_or_fallback(title: &str, keywords: &KeywordSet, fallback: &Label) -> Label {
    classify_title(title, keywords)
        .labels
        .into_iter()
        .next()
        .unwrap_or_else(|| fallback.clone())
}
