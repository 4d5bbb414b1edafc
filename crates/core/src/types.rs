use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    #[default]
    Document,
    Guideline,
    Image,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [Self::Video, Self::Document, Self::Guideline, Self::Image];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "video" => Some(Self::Video),
            "document" => Some(Self::Document),
            "guideline" => Some(Self::Guideline),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Document => "document",
            Self::Guideline => "guideline",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Routine,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category bucket name, e.g. `critical_care` or `general`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One piece of upstream content. Loaded once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub file_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl ContentRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content_type,
            file_url: String::new(),
            size: None,
            last_modified: None,
        }
    }

    pub fn with_file_url(mut self, file_url: impl Into<String>) -> Self {
        self.file_url = file_url.into();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_last_modified(mut self, last_modified: impl Into<String>) -> Self {
        self.last_modified = Some(last_modified.into());
        self
    }

    /// Last path segment of `fileUrl`.
    pub fn filename(&self) -> &str {
        self.file_url.rsplit('/').next().unwrap_or("")
    }

    pub fn title_lower(&self) -> String {
        self.title.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parse() {
        assert_eq!(ContentType::parse("video"), Some(ContentType::Video));
        assert_eq!(ContentType::parse(" Guideline "), Some(ContentType::Guideline));
        assert_eq!(ContentType::parse("podcast"), None);
    }

    #[test]
    fn record_deserializes_camel_case() {
        let json = r#"{"id":"v1","title":"ECMO Cannulation","type":"video","fileUrl":"videos/ecmo.mp4","size":2048,"lastModified":"2024-05-01"}"#;
        let record: ContentRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.content_type, ContentType::Video);
        assert_eq!(record.file_url, "videos/ecmo.mp4");
        assert_eq!(record.size, Some(2048));
        assert_eq!(record.filename(), "ecmo.mp4");
    }

    #[test]
    fn record_type_defaults_to_document() {
        let record: ContentRecord = serde_json::from_str(r#"{"id":"d1","title":"Memo"}"#).unwrap();
        assert_eq!(record.content_type, ContentType::Document);
        assert_eq!(record.filename(), "");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<ContentRecord, _> =
            serde_json::from_str(r#"{"id":"x","title":"T","type":"podcast"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn label_trims_and_compares() {
        let label = Label::new("  critical_care ");
        assert_eq!(label, "critical_care");
        assert_eq!(label.to_string(), "critical_care");
    }
}
