use crate::types::{ContentRecord, ContentType};

pub fn record(id: &str, title: &str, content_type: ContentType) -> ContentRecord {
    ContentRecord::new(id, title, content_type).with_file_url(format!("space/{id}"))
}

/// A small mixed library covering every content type and some contested titles.
pub fn sample_records() -> Vec<ContentRecord> {
    vec![
        record("v1", "ECMO Cannulation Video", ContentType::Video),
        record("v2", "Laparoscopic Appendectomy", ContentType::Video),
        record("v3", "Neonatal Hernia Repair", ContentType::Video),
        record("v4", "Trauma Surgery Walkthrough", ContentType::Video),
        record("g1", "ECMO Anticoagulation Guideline", ContentType::Guideline),
        record("g2", "NICU Dosing Guideline", ContentType::Guideline),
        record("d1", "Resident Curriculum 2024", ContentType::Document),
        record("d2", "Fellowship Case Requirements", ContentType::Document),
        record("i1", "Unrelated Memo", ContentType::Image),
        record("i2", "", ContentType::Image),
    ]
}
