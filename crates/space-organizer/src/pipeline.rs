use anyhow::Context;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

use space_tree_core::{verify_coverage, ContentRecord, SpaceStructure};

use crate::analyzer::{analyses_by_id, categorize, CategoryCard, ContentAnalyzer, ItemAnalysis};
use crate::config::Config;
use crate::designer::SpaceDesigner;
use crate::loader::{dedup_by_id, load_records, load_structure, load_transcriptions, merge_records};
use crate::mapper::{map_file_urls, MappingStats};
use crate::report::{render_markdown, write_json};
use crate::source::ContentSource;
use crate::transcriber::{write_transcriptions, TranscribeStats};

/// Where a run takes its records from.
#[derive(Debug, Clone, Default)]
pub struct RecordSources {
    pub input: Option<PathBuf>,
    pub transcriptions: Option<PathBuf>,
    pub fetch: bool,
    pub space_id: Option<u32>,
}

impl RecordSources {
    fn transcriptions_dir<'a>(&'a self, config: &'a Config) -> Option<&'a PathBuf> {
        self.transcriptions
            .as_ref()
            .or(config.transcriptions_dir.as_ref())
    }

    fn has_local(&self, config: &Config) -> bool {
        self.input.is_some() || self.transcriptions_dir(config).is_some()
    }
}

/// Local files first, then the content service when `fetch` is set.
pub fn gather_records(config: &Config, sources: &RecordSources) -> anyhow::Result<Vec<ContentRecord>> {
    if !sources.has_local(config) && !sources.fetch {
        anyhow::bail!("no records to process: pass --input, --transcriptions or --fetch");
    }

    let mut local = Vec::new();
    if let Some(input) = &sources.input {
        local.extend(load_records(input).with_context(|| format!("loading {}", input.display()))?);
    }
    if let Some(dir) = sources.transcriptions_dir(config) {
        local.extend(
            load_transcriptions(dir)
                .with_context(|| format!("loading transcriptions from {}", dir.display()))?,
        );
    }

    let fetched = if sources.fetch {
        let space_id = sources.space_id.unwrap_or(config.api.space_id);
        ContentSource::new(&config.api).fetch_or_empty(space_id)
    } else {
        Vec::new()
    };

    let records = merge_records(local, fetched);
    info!(records = records.len(), "gathered records");
    Ok(records)
}

pub struct AnalysisOutcome {
    pub analyses: Vec<ItemAnalysis>,
    pub categories: Vec<CategoryCard>,
}

/// Analyzes every record and writes the per-item analysis and the categorization.
pub fn run_analyze(
    config: &Config,
    records: &[ContentRecord],
    on_item: impl FnMut(&ContentRecord),
) -> anyhow::Result<AnalysisOutcome> {
    let analyses = ContentAnalyzer::default().analyze_all(records, on_item);
    let categories = categorize(&analyses);

    write_json(&config.analysis_path(), &analyses_by_id(&analyses))
        .with_context(|| format!("writing {}", config.analysis_path().display()))?;
    write_json(&config.categorization_path(), &categories)
        .with_context(|| format!("writing {}", config.categorization_path().display()))?;

    info!(
        items = analyses.len(),
        categories = categories.len(),
        "analysis written"
    );
    Ok(AnalysisOutcome {
        analyses,
        categories,
    })
}

/// Analyzes every record and writes one transcription file per item, ready
/// for `design --transcriptions`.
pub fn run_transcribe(
    root: &Path,
    records: &[ContentRecord],
    on_item: impl FnMut(&ContentRecord),
) -> anyhow::Result<TranscribeStats> {
    let analyses = ContentAnalyzer::default().analyze_all(records, on_item);
    write_transcriptions(root, &analyses)
        .with_context(|| format!("writing transcriptions to {}", root.display()))
}

/// Designs the space structure, checks that every record was placed once,
/// and writes it for later `map-urls`/`report` runs.
pub fn run_design(config: &Config, records: &[ContentRecord]) -> anyhow::Result<SpaceStructure> {
    let records = dedup_by_id(records.to_vec());
    let structure = SpaceDesigner::new(&config.taxonomy).design(&records);

    verify_coverage(&structure, &records).context("structure does not cover the input")?;

    let path = config.structure_path();
    write_json(&path, &structure).with_context(|| format!("writing {}", path.display()))?;

    info!(
        cards = structure.analysis_summary.categories_created,
        items = structure.total_content,
        path = %path.display(),
        "structure written"
    );
    Ok(structure)
}

fn read_structure(config: &Config) -> anyhow::Result<SpaceStructure> {
    let path = config.structure_path();
    load_structure(&path).with_context(|| format!("reading structure {} (run `design` first)", path.display()))
}

/// Rewrites the saved structure with upstream file URLs.
pub fn run_map_urls(config: &Config, upstream: &[ContentRecord]) -> anyhow::Result<MappingStats> {
    let mut structure = read_structure(config)?;
    let stats = map_file_urls(&mut structure, upstream);

    let path = config.structure_path();
    write_json(&path, &structure).with_context(|| format!("writing {}", path.display()))?;

    info!(mapped = stats.mapped, total = stats.total, "file URLs mapped");
    Ok(stats)
}

/// Renders the saved structure as a Markdown report.
pub fn run_report(config: &Config) -> anyhow::Result<PathBuf> {
    let structure = read_structure(config)?;
    let markdown = render_markdown(&structure, &config.taxonomy, Utc::now());

    let path = config.report_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, markdown).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
