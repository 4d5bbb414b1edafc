//! Per-item transcription stubs under `videos/`, `documents/`, `guidelines/`
//! and `images/`, in the shape `load_transcriptions` reads back.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use space_tree_core::{ContentType, Urgency};

use crate::analyzer::{Complexity, ContentAnalysis, DocumentKind, ItemAnalysis, Specialty};
use crate::report::write_json;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    FrameworkCreated,
    MetadataOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoTranscription {
    pub video_id: String,
    pub title: String,
    #[serde(rename = "fileUrl")]
    pub file_url: String,
    pub transcription_status: Status,
    pub transcription_text: String,
    pub procedure_type: String,
    pub specialty: Specialty,
    pub complexity: Option<Complexity>,
    pub medical_terms_found: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentExtraction {
    pub document_id: String,
    pub title: String,
    #[serde(rename = "fileUrl")]
    pub file_url: String,
    pub extraction_status: Status,
    pub extracted_text: String,
    pub content_type: DocumentKind,
    pub specialty: Specialty,
    pub urgency: Urgency,
    pub medical_terms_found: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageExtraction {
    pub image_id: String,
    pub title: String,
    #[serde(rename = "fileUrl")]
    pub file_url: String,
    pub extraction_status: Status,
    pub extracted_text: String,
    pub image_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranscriptionFile {
    Video(VideoTranscription),
    Document(DocumentExtraction),
    Image(ImageExtraction),
}

impl TranscriptionFile {
    pub fn from_analysis(item: &ItemAnalysis) -> Self {
        let file_url = if item.file_url.is_empty() {
            item.id.clone()
        } else {
            item.file_url.clone()
        };
        let terms = item.filename_analysis.medical_terms.clone();

        match item.content_type {
            ContentType::Video => {
                let video = match &item.content_analysis {
                    ContentAnalysis::Video(video) => Some(video),
                    _ => None,
                };
                Self::Video(VideoTranscription {
                    video_id: item.id.clone(),
                    title: item.title.clone(),
                    file_url,
                    transcription_status: Status::FrameworkCreated,
                    transcription_text: String::new(),
                    procedure_type: video
                        .map(|v| v.procedure_type.clone())
                        .unwrap_or_else(|| "unknown".to_string()),
                    specialty: video.map(|v| v.specialty).unwrap_or(Specialty::Unknown),
                    complexity: video.map(|v| v.complexity),
                    medical_terms_found: terms,
                })
            }
            ContentType::Document | ContentType::Guideline => {
                let analysis = &item.filename_analysis;
                Self::Document(DocumentExtraction {
                    document_id: item.id.clone(),
                    title: item.title.clone(),
                    file_url,
                    extraction_status: Status::FrameworkCreated,
                    extracted_text: String::new(),
                    content_type: analysis.content_type,
                    specialty: analysis.specialty,
                    urgency: analysis.urgency,
                    medical_terms_found: terms,
                })
            }
            ContentType::Image => Self::Image(ImageExtraction {
                image_id: item.id.clone(),
                title: item.title.clone(),
                file_url,
                extraction_status: Status::MetadataOnly,
                extracted_text: String::new(),
                image_description: format!("Medical image: {}", item.title),
            }),
        }
    }
}

/// Subdirectory a content type is written to.
pub fn subdir(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Video => "videos",
        ContentType::Document => "documents",
        ContentType::Guideline => "guidelines",
        ContentType::Image => "images",
    }
}

/// `a/b c` -> `a_b_c.json`
pub fn file_name(id: &str) -> String {
    format!("{}.json", id.replace(['/', ' '], "_"))
}

/// Files written per subdirectory.
pub type TranscribeStats = BTreeMap<&'static str, usize>;

/// Writes one file per analyzed item. A repeated id, or two ids that map to the
/// same file name, keep the first item's file.
pub fn write_transcriptions(
    root: &Path,
    analyses: &[ItemAnalysis],
) -> Result<TranscribeStats, TranscribeError> {
    let mut written = HashSet::new();
    let mut stats = TranscribeStats::new();

    for item in analyses {
        let dir = subdir(item.content_type);
        let path = root.join(dir).join(file_name(&item.id));
        if !written.insert(path.clone()) {
            warn!(id = %item.id, path = %path.display(), "file name already taken, skipping");
            continue;
        }

        write_json(&path, &TranscriptionFile::from_analysis(item))
            .map_err(|source| TranscribeError::Write { path, source })?;
        *stats.entry(dir).or_insert(0) += 1;
    }

    info!(root = %root.display(), files = written.len(), "transcriptions written");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ContentAnalyzer;
    use serde_json::Value;
    use space_tree_core::ContentRecord;
    use tempfile::TempDir;

    fn read(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn file_names_replace_slashes_and_spaces() {
        assert_eq!(file_name("space/v1 final"), "space_v1_final.json");
        assert_eq!(file_name("g1"), "g1.json");
    }

    #[test]
    fn video_file_carries_procedure_fields() {
        let analyzer = ContentAnalyzer::default();
        let item = analyzer.analyze(
            &ContentRecord::new("v1", "ECMO Cannulation Video", ContentType::Video)
                .with_file_url("space/ecmo_cannulation.mp4"),
        );

        let json = serde_json::to_value(TranscriptionFile::from_analysis(&item)).unwrap();
        assert_eq!(json["video_id"], "v1");
        assert_eq!(json["fileUrl"], "space/ecmo_cannulation.mp4");
        assert_eq!(json["procedure_type"], "ECMO cannulation procedure");
        assert_eq!(json["specialty"], "ecmo");
        assert_eq!(json["complexity"], "complex");
        assert_eq!(json["transcription_status"], "framework_created");
        assert!(json["medical_terms_found"].is_array());
    }

    #[test]
    fn writes_one_file_per_item_by_type() {
        let dir = TempDir::new().unwrap();
        let analyzer = ContentAnalyzer::default();
        let analyses = analyzer.analyze_all(
            &[
                ContentRecord::new("v1", "ECMO Cannulation", ContentType::Video),
                ContentRecord::new("space/g 1", "Emergency Sepsis Guideline", ContentType::Guideline)
                    .with_file_url("space/emergency_sepsis_guideline.pdf"),
                ContentRecord::new("i1", "Chart", ContentType::Image),
            ],
            |_| {},
        );

        let stats = write_transcriptions(dir.path(), &analyses).unwrap();
        assert_eq!(stats.get("videos"), Some(&1));
        assert_eq!(stats.get("guidelines"), Some(&1));
        assert_eq!(stats.get("images"), Some(&1));
        assert_eq!(stats.get("documents"), None);

        let guideline = read(&dir.path().join("guidelines/space_g_1.json"));
        assert_eq!(guideline["document_id"], "space/g 1");
        assert_eq!(guideline["content_type"], "guideline");
        assert_eq!(guideline["urgency"], "urgent");

        let image = read(&dir.path().join("images/i1.json"));
        assert_eq!(image["image_id"], "i1");
        assert_eq!(image["extraction_status"], "metadata_only");
        assert_eq!(image["fileUrl"], "i1");
    }

    #[test]
    fn colliding_file_names_keep_first() {
        let dir = TempDir::new().unwrap();
        let analyzer = ContentAnalyzer::default();
        let analyses = vec![
            analyzer.analyze(&ContentRecord::new("a/b", "First", ContentType::Document)),
            analyzer.analyze(&ContentRecord::new("a b", "Second", ContentType::Document)),
        ];

        let stats = write_transcriptions(dir.path(), &analyses).unwrap();
        assert_eq!(stats.get("documents"), Some(&1));
        assert_eq!(read(&dir.path().join("documents/a_b.json"))["title"], "First");
    }
}
