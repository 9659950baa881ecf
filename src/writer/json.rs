use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::SearchMetadata;
use crate::models::{ListingRecord, ResultSet};
use crate::Result;

#[derive(Debug, Serialize)]
pub struct ResultDocument<'a> {
    pub search_query: &'a str,
    pub search_url: &'a str,
    pub total_results: usize,
    pub scraped_at: DateTime<Utc>,
    pub results: &'a [ListingRecord],
}

impl<'a> ResultDocument<'a> {
    pub fn new(results: &'a ResultSet, metadata: &'a SearchMetadata) -> Self {
        Self {
            search_query: &metadata.query,
            search_url: &metadata.source_url,
            total_results: results.len(),
            scraped_at: metadata.scraped_at,
            results: results.as_slice(),
        }
    }
}

pub fn write_json(path: &Path, results: &ResultSet, metadata: &SearchMetadata) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &ResultDocument::new(results, metadata))?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
