use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use space_tree_core::{ContentRecord, ContentType, SpaceStructure};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("transcription directory not found: {0}")]
    MissingDir(PathBuf),
    #[error("{path} has no {field}")]
    MissingId { path: PathBuf, field: &'static str },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Bare(Vec<ContentRecord>),
    Wrapped { content: Vec<ContentRecord> },
}

#[derive(Deserialize)]
struct Transcription {
    #[serde(alias = "video_id", alias = "document_id", alias = "image_id")]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default, rename = "fileUrl", alias = "file_url")]
    file_url: Option<String>,
}

/// Transcription subdirectories, the id field their files carry, and the
/// content type the directory implies.
const TRANSCRIPTION_DIRS: &[(&str, &str, ContentType)] = &[
    ("videos", "video_id", ContentType::Video),
    ("documents", "document_id", ContentType::Document),
    ("guidelines", "document_id", ContentType::Guideline),
    ("images", "image_id", ContentType::Image),
];

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads records from either a bare JSON array or an object with a `content` array.
pub fn load_records(path: &Path) -> Result<Vec<ContentRecord>, LoadError> {
    let records = match read_json::<RecordFile>(path)? {
        RecordFile::Bare(records) => records,
        RecordFile::Wrapped { content } => content,
    };
    info!(path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}

/// Reads a structure previously written by `design`.
pub fn load_structure(path: &Path) -> Result<SpaceStructure, LoadError> {
    read_json(path)
}

/// Builds records from per-item transcription files under `videos/`,
/// `documents/`, `guidelines/` and `images/`. Absent subdirectories are skipped.
pub fn load_transcriptions(root: &Path) -> Result<Vec<ContentRecord>, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::MissingDir(root.to_path_buf()));
    }

    let mut records = Vec::new();

    for &(subdir, field, content_type) in TRANSCRIPTION_DIRS {
        let dir = root.join(subdir);
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "transcription subdirectory missing, skipping");
            continue;
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let transcription: Transcription = read_json(&path)?;
            let id = transcription
                .id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| LoadError::MissingId {
                    path: path.clone(),
                    field,
                })?;

            let file_url = transcription.file_url.unwrap_or_else(|| id.clone());
            records.push(
                ContentRecord::new(id, transcription.title, content_type).with_file_url(file_url),
            );
        }
    }

    info!(root = %root.display(), records = records.len(), "loaded transcriptions");
    Ok(records)
}

/// Keeps the first occurrence of every id, in input order.
pub fn dedup_by_id(records: Vec<ContentRecord>) -> Vec<ContentRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}

/// Local records first; fetched records add unseen ids and fill in an empty `fileUrl`.
pub fn merge_records(local: Vec<ContentRecord>, fetched: Vec<ContentRecord>) -> Vec<ContentRecord> {
    let mut merged = dedup_by_id(local);
    let mut positions: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.clone(), i))
        .collect();

    for record in fetched {
        match positions.get(&record.id) {
            Some(&i) => {
                if merged[i].file_url.is_empty() {
                    merged[i].file_url = record.file_url;
                }
            }
            None => {
                positions.insert(record.id.clone(), merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_bare_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"[{"id":"a","title":"ECMO","type":"video"},{"id":"b","title":"Memo"}]"#,
        )
        .unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content_type, ContentType::Video);
        assert_eq!(records[1].content_type, ContentType::Document);
    }

    #[test]
    fn loads_wrapped_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("space.json");
        std::fs::write(
            &path,
            r#"{"content":[{"id":"a","title":"ECMO","type":"guideline","fileUrl":"s3/a.pdf"}]}"#,
        )
        .unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records[0].file_url, "s3/a.pdf");
        assert_eq!(records[0].content_type, ContentType::Guideline);
    }

    #[test]
    fn malformed_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"items": 3}"#).unwrap();

        assert!(matches!(load_records(&path), Err(LoadError::Json { .. })));
        assert!(matches!(
            load_records(&dir.path().join("missing.json")),
            Err(LoadError::Read { .. })
        ));
    }

    #[test]
    fn loads_transcription_directories() {
        let dir = TempDir::new().unwrap();
        let videos = dir.path().join("videos");
        let guidelines = dir.path().join("guidelines");
        std::fs::create_dir_all(&videos).unwrap();
        std::fs::create_dir_all(&guidelines).unwrap();

        std::fs::write(
            videos.join("b.json"),
            r#"{"video_id":"v2","title":"Appendectomy Steps"}"#,
        )
        .unwrap();
        std::fs::write(
            videos.join("a.json"),
            r#"{"video_id":"v1","title":"ECMO Cannulation","fileUrl":"s3/v1.mp4"}"#,
        )
        .unwrap();
        std::fs::write(videos.join("notes.txt"), "ignored").unwrap();
        std::fs::write(
            guidelines.join("g.json"),
            r#"{"document_id":"g1","title":"Sepsis Guideline"}"#,
        )
        .unwrap();

        let records = load_transcriptions(dir.path()).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2", "g1"]);
        assert_eq!(records[0].file_url, "s3/v1.mp4");
        assert_eq!(records[1].file_url, "v2");
        assert_eq!(records[2].content_type, ContentType::Guideline);
    }

    #[test]
    fn reads_image_ids_and_snake_case_urls() {
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("images");
        std::fs::create_dir_all(&images).unwrap();
        std::fs::write(
            images.join("i.json"),
            r#"{"image_id":"i1","title":"Chart","file_url":"s3/i1.png"}"#,
        )
        .unwrap();

        let records = load_transcriptions(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content_type, ContentType::Image);
        assert_eq!(records[0].file_url, "s3/i1.png");
    }

    #[test]
    fn transcription_without_id_is_an_error() {
        let dir = TempDir::new().unwrap();
        let documents = dir.path().join("documents");
        std::fs::create_dir_all(&documents).unwrap();
        std::fs::write(documents.join("d.json"), r#"{"title":"Orphan"}"#).unwrap();

        assert!(matches!(
            load_transcriptions(dir.path()),
            Err(LoadError::MissingId { field: "document_id", .. })
        ));
    }

    #[test]
    fn missing_transcription_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_transcriptions(&dir.path().join("nope")),
            Err(LoadError::MissingDir(_))
        ));
    }

    #[test]
    fn structure_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("structure.json");
        let structure = SpaceStructure::new(Vec::new());
        std::fs::write(&path, serde_json::to_string(&structure).unwrap()).unwrap();

        assert_eq!(load_structure(&path).unwrap(), structure);
    }

    #[test]
    fn merge_prefers_local_and_fills_urls() {
        let local = vec![
            ContentRecord::new("a", "Local A", ContentType::Video),
            ContentRecord::new("b", "Local B", ContentType::Video).with_file_url("local/b"),
        ];
        let fetched = vec![
            ContentRecord::new("a", "Remote A", ContentType::Video).with_file_url("s3/a"),
            ContentRecord::new("b", "Remote B", ContentType::Video).with_file_url("s3/b"),
            ContentRecord::new("c", "Remote C", ContentType::Image),
            ContentRecord::new("c", "Remote C again", ContentType::Image),
        ];

        let merged = merge_records(local, fetched);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].title, "Local A");
        assert_eq!(merged[0].file_url, "s3/a");
        assert_eq!(merged[1].file_url, "local/b");
        assert_eq!(merged[2].title, "Remote C");
    }

    #[test]
    fn dedup_keeps_first() {
        let records = vec![
            ContentRecord::new("a", "First", ContentType::Video),
            ContentRecord::new("a", "Second", ContentType::Video),
        ];
        let deduped = dedup_by_id(records);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].title, "First");
    }
}
