//! Output encodings for a scrape's result set.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::config::OutputConfig;
use crate::models::ResultSet;
use crate::Result;

pub mod json;
pub mod report;
pub mod tabular;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Text,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Json, OutputFormat::Csv, OutputFormat::Text];
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Header information shared by the structured and text encodings.
#[derive(Debug, Clone)]
pub struct SearchMetadata {
    pub query: String,
    pub source_url: String,
    pub scraped_at: DateTime<Utc>,
}

impl SearchMetadata {
    pub fn now(query: &str, source_url: &str) -> Self {
        Self {
            query: query.to_string(),
            source_url: source_url.to_string(),
            scraped_at: Utc::now(),
        }
    }
}

pub struct ResultWriter {
    config: OutputConfig,
}

impl ResultWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn path_for(&self, format: OutputFormat) -> PathBuf {
        let name = match format {
            OutputFormat::Json => &self.config.json_file,
            OutputFormat::Csv => &self.config.csv_file,
            OutputFormat::Text => &self.config.text_file,
        };
        self.config.directory.join(name)
    }

    /// Write each requested format independently. Failures are logged and
    /// skipped; the paths actually written are returned in request order.
    pub fn write(
        &self,
        results: &ResultSet,
        formats: &[OutputFormat],
        metadata: &SearchMetadata,
    ) -> Vec<PathBuf> {
        let mut written = Vec::new();

        for &format in formats {
            if results.is_empty() && !self.writes_when_empty(format) {
                warn!(%format, "No results to save");
                continue;
            }

            let path = self.path_for(format);
            match self.write_one(format, &path, results, metadata) {
                Ok(()) => {
                    info!(%format, path = %path.display(), "Results saved");
                    written.push(path);
                }
                Err(e) => error!(%format, path = %path.display(), "Failed to write results: {}", e),
            }
        }

        written
    }

    fn writes_when_empty(&self, format: OutputFormat) -> bool {
        format == OutputFormat::Json && self.config.write_empty_json
    }

    fn write_one(
        &self,
        format: OutputFormat,
        path: &Path,
        results: &ResultSet,
        metadata: &SearchMetadata,
    ) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        match format {
            OutputFormat::Json => json::write_json(path, results, metadata),
            OutputFormat::Csv => tabular::write_csv(path, results),
            OutputFormat::Text => report::write_report(path, results, metadata),
        }
    }
}
