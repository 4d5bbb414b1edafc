pub mod analyzer;
pub mod config;
pub mod designer;
pub mod loader;
pub mod mapper;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod taxonomy;
pub mod transcriber;

pub use analyzer::{
    categorize, detect_urgency, CategoryCard, ContentAnalysis, ContentAnalyzer, ItemAnalysis,
};
pub use config::{ApiConfig, Config, ConfigError};
pub use designer::SpaceDesigner;
pub use loader::{
    dedup_by_id, load_records, load_structure, load_transcriptions, merge_records, LoadError,
};
pub use mapper::{map_file_urls, MappingStats};
pub use pipeline::{
    gather_records, run_analyze, run_design, run_map_urls, run_report, run_transcribe,
    AnalysisOutcome, RecordSources,
};
pub use report::{
    format_grouping, format_structure_summary, grouping_summary, render_markdown, write_json,
    GroupSummary,
};
pub use source::{ContentSource, FetchError};
pub use taxonomy::{CardSource, CardSpec, CatchAllSpec, CollectionSpec, Taxonomy, TaxonomyError};
pub use transcriber::{write_transcriptions, TranscribeError, TranscribeStats, TranscriptionFile};
