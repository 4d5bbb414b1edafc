pub mod classifier;
pub mod fingerprint;
pub mod grouper;
pub mod keywords;
pub mod reconcile;
pub mod slug;
pub mod structure;
#[cfg(test)]
mod testutils;
pub mod types;

pub use classifier::{classify_title, label_or_fallback, Classification, Classifier, SubstringClassifier};
pub use fingerprint::{hash_content, structure_fingerprint};
pub use grouper::{
    assign_to_collection, claim_remaining, group_by_keyword_set, group_candidates, Group, Grouping,
    GroupingError, UsedIds,
};
pub use keywords::{normalize_keywords, KeywordRule, KeywordSet, KeywordSetError};
pub use reconcile::{reconcile_counts, verify_coverage, CoverageError};
pub use slug::slugify;
pub use structure::{
    CardCollection, ContentItem, Priority, SpaceCard, SpaceStructure, StructureSummary,
};
pub use types::{ContentRecord, ContentType, Label, Urgency};
