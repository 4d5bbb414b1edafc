use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use space_organizer::{
    format_grouping, format_structure_summary, gather_records, grouping_summary, run_analyze,
    run_design, run_map_urls, run_report, run_transcribe, write_json, Config, RecordSources,
};
use space_tree_core::{group_by_keyword_set, Classifier, ContentRecord, SubstringClassifier, UsedIds};

const TICK_MS: u64 = 80;

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(" {spinner} {msg}")
        .unwrap()
        .tick_chars("▏▎▍▌▋▊▉█▉▋▌▍▎")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(":: {spinner} {msg:<16} ━{bar:30}━ {pos}/{len} | ETA {eta}")
        .unwrap()
        .tick_chars("▏▎▍▌▋▊▉█▉▋▌▍▎")
        .progress_chars("━━░")
}

#[derive(Parser)]
#[command(name = "space-organizer")]
#[command(version)]
#[command(about = "Arrange content library records into cards and collections")]
struct Cli {
    #[arg(short, long, global = true, env = "SPACE_ORGANIZER_CONFIG", help = "Config file (JSON or YAML)")]
    config: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Debug logging")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    #[arg(short, long, help = "Records file (JSON array or {\"content\": [...]})")]
    input: Option<PathBuf>,
    #[arg(short, long, help = "Transcription directory (videos/, documents/, guidelines/)")]
    transcriptions: Option<PathBuf>,
    #[arg(long, help = "Also fetch records from the content service")]
    fetch: bool,
    #[arg(long, help = "Space to fetch [default: from config]")]
    space_id: Option<u32>,
}

impl SourceArgs {
    fn into_sources(self) -> RecordSources {
        RecordSources {
            input: self.input,
            transcriptions: self.transcriptions,
            fetch: self.fetch,
            space_id: self.space_id,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    Specialties,
    Procedures,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze records and write per-item analysis and categorization
    Analyze {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(short, long, help = "Output directory [default: from config]")]
        output: Option<PathBuf>,
    },
    /// Write one transcription file per record for later `design --transcriptions`
    Transcribe {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(long, help = "Directory to write [default: transcriptions_dir, else <output>/content_transcriptions]")]
        dir: Option<PathBuf>,
        #[arg(short, long, help = "Output directory [default: from config]")]
        output: Option<PathBuf>,
    },
    /// Build the card/collection structure
    Design {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(short, long, help = "Output directory [default: from config]")]
        output: Option<PathBuf>,
    },
    /// Group records by one keyword table, first-declared label wins
    Group {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(long, value_enum, default_value = "specialties", help = "Keyword table")]
        table: Table,
        #[arg(long, default_value = "general", help = "Label for unmatched records")]
        fallback: String,
        #[arg(long, help = "Write groups as JSON to this file")]
        json: Option<PathBuf>,
    },
    /// Show the labels a title matches
    Classify {
        #[arg(help = "Title to classify")]
        title: String,
    },
    /// Point structure items at upstream file URLs
    MapUrls {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(short, long, help = "Output directory [default: from config]")]
        output: Option<PathBuf>,
    },
    /// Write a Markdown report for the saved structure
    Report {
        #[arg(short, long, help = "Output directory [default: from config]")]
        output: Option<PathBuf>,
    },
    /// Write the default configuration
    InitConfig {
        #[arg(help = "Path to write (.json, .yaml or .yml)")]
        path: PathBuf,
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(help = "Shell to generate for (bash, zsh, fish, powershell)")]
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "space_organizer=debug,warn"
    } else {
        "space_organizer=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, output: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load_or_default(path).context("loading config")?;
    if let Some(output) = output {
        config.output_dir = output;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze { sources, output } => {
            cmd_analyze(&load_config(config_path, output)?, sources.into_sources())
        }
        Commands::Transcribe {
            sources,
            dir,
            output,
        } => cmd_transcribe(
            &load_config(config_path, output)?,
            sources.into_sources(),
            dir,
        ),
        Commands::Design { sources, output } => {
            cmd_design(&load_config(config_path, output)?, sources.into_sources())
        }
        Commands::Group {
            sources,
            table,
            fallback,
            json,
        } => cmd_group(
            &load_config(config_path, None)?,
            sources.into_sources(),
            table,
            &fallback,
            json.as_deref(),
        ),
        Commands::Classify { title } => cmd_classify(&load_config(config_path, None)?, &title),
        Commands::MapUrls { sources, output } => {
            cmd_map_urls(&load_config(config_path, output)?, sources.into_sources())
        }
        Commands::Report { output } => cmd_report(&load_config(config_path, output)?),
        Commands::InitConfig { path, force } => cmd_init_config(&path, force),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "space-organizer",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

fn gather_with_spinner(config: &Config, sources: &RecordSources) -> Result<Vec<ContentRecord>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.enable_steady_tick(Duration::from_millis(TICK_MS));
    pb.set_message("Loading records");

    let records = gather_records(config, sources);
    pb.finish_and_clear();
    records
}

fn cmd_analyze(config: &Config, sources: RecordSources) -> Result<()> {
    let records = gather_with_spinner(config, &sources)?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(bar_style());
    pb.enable_steady_tick(Duration::from_millis(TICK_MS));
    pb.set_message("Analyzing");

    let outcome = run_analyze(config, &records, |_| pb.inc(1))?;
    pb.finish_and_clear();

    println!("Analyzed {} items:\n", outcome.analyses.len());
    for card in &outcome.categories {
        println!("  {:>5}  {}", card.total_items, card.title);
        for collection in &card.collections {
            println!("         {} ({})", collection.title, collection.total_count);
        }
    }
    println!("\nWrote {}", config.analysis_path().display());
    println!("Wrote {}", config.categorization_path().display());

    Ok(())
}

fn cmd_transcribe(config: &Config, sources: RecordSources, dir: Option<PathBuf>) -> Result<()> {
    let root = dir.unwrap_or_else(|| config.transcriptions_path());
    // The destination is not an input.
    let inputs = Config {
        transcriptions_dir: None,
        ..config.clone()
    };
    let records = gather_with_spinner(&inputs, &sources)?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(bar_style());
    pb.enable_steady_tick(Duration::from_millis(TICK_MS));
    pb.set_message("Transcribing");

    let stats = run_transcribe(&root, &records, |_| pb.inc(1))?;
    pb.finish_and_clear();

    for (dir, count) in &stats {
        println!("  {:>5}  {}", count, dir);
    }
    println!("\nWrote {}", root.display());

    Ok(())
}

fn cmd_design(config: &Config, sources: RecordSources) -> Result<()> {
    let records = gather_with_spinner(config, &sources)?;
    let structure = run_design(config, &records)?;

    println!("{}", format_structure_summary(&structure));
    println!("\nWrote {}", config.structure_path().display());

    Ok(())
}

fn cmd_group(
    config: &Config,
    sources: RecordSources,
    table: Table,
    fallback: &str,
    json: Option<&Path>,
) -> Result<()> {
    let records = gather_with_spinner(config, &sources)?;
    let keywords = match table {
        Table::Specialties => &config.taxonomy.specialties,
        Table::Procedures => &config.taxonomy.procedures,
    };

    let grouping = group_by_keyword_set(&records, keywords, fallback, &mut UsedIds::new())?;
    print!("{}", format_grouping(&grouping));

    if let Some(path) = json {
        write_json(path, &grouping_summary(&grouping))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nWrote {}", path.display());
    }

    Ok(())
}

fn cmd_classify(config: &Config, title: &str) -> Result<()> {
    let taxonomy = &config.taxonomy;
    let specialties =
        SubstringClassifier::new(taxonomy.specialties.clone(), taxonomy.fallback_specialty.clone());
    let procedures = SubstringClassifier::new(taxonomy.procedures.clone(), "none");

    let result = specialties.classify(title);

    println!("Title: {}", title);
    println!("Specialty: {}", specialties.primary_label(title));
    if result.labels.len() > 1 {
        let all: Vec<&str> = result.labels.iter().map(|l| l.as_str()).collect();
        println!("All specialties: {}", all.join(", "));
    }
    println!("Procedure: {}", procedures.primary_label(title));

    if !result.matched_keywords.is_empty() {
        println!("Matched keywords: {}", result.matched_keywords.join(", "));
    }

    Ok(())
}

fn cmd_map_urls(config: &Config, sources: RecordSources) -> Result<()> {
    let upstream = gather_with_spinner(config, &sources)?;
    let stats = run_map_urls(config, &upstream)?;

    println!("Mapped {}/{} items to file URLs", stats.mapped, stats.total);
    if stats.unmapped > 0 {
        println!("{} item(s) kept their id as the file URL", stats.unmapped);
    }
    println!("Wrote {}", config.structure_path().display());

    Ok(())
}

fn cmd_report(config: &Config) -> Result<()> {
    let path = run_report(config)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default()
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote default config to {}", path.display());

    Ok(())
}
