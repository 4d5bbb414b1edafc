use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::taxonomy::{Taxonomy, TaxonomyError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config: {0}")]
    Write(#[from] std::io::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid taxonomy: {0}")]
    Taxonomy(#[from] TaxonomyError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub transcriptions_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub taxonomy: Taxonomy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub space_id: u32,
    /// Pause between consecutive requests to the content service.
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            space_id: 4,
            request_delay_ms: 100,
            timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            transcriptions_dir: None,
            output_dir: PathBuf::from("."),
            taxonomy: Taxonomy::default(),
        }
    }
}

impl Config {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn structure_path(&self) -> PathBuf {
        self.output_dir.join("intelligent_space_structure.json")
    }

    pub fn analysis_path(&self) -> PathBuf {
        self.output_dir.join("detailed_content_analysis.json")
    }

    pub fn categorization_path(&self) -> PathBuf {
        self.output_dir.join("intelligent_categorization.json")
    }

    /// Where `transcribe` writes; the configured transcription directory when set.
    pub fn transcriptions_path(&self) -> PathBuf {
        self.transcriptions_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("content_transcriptions"))
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join("INTELLIGENT_STRUCTURE_REPORT.md")
    }

    /// Loads JSON, or YAML when the extension is `.yaml`/`.yml`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config.taxonomy.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map(Self::load).unwrap_or_else(|| Ok(Self::default()))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content).map_err(Into::into)
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}
