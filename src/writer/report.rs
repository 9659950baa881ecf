use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::SearchMetadata;
use crate::models::ResultSet;
use crate::Result;

pub fn write_report(path: &Path, results: &ResultSet, metadata: &SearchMetadata) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    render_report(&mut out, results, metadata)?;
    out.flush()?;
    Ok(())
}

pub fn render_report<W: Write>(out: &mut W, results: &ResultSet, metadata: &SearchMetadata) -> Result<()> {
    writeln!(out, "OLX Car Cover Search Results")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out)?;
    writeln!(out, "Search Query: {}", metadata.query)?;
    writeln!(out, "Search URL: {}", metadata.source_url)?;
    writeln!(out, "Total Results: {}", results.len())?;
    writeln!(out, "Scraped At: {}", metadata.scraped_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;

    for (index, record) in results.iter().enumerate() {
        writeln!(out, "Listing {}:", index + 1)?;
        writeln!(out, "  Title: {}", record.title)?;
        writeln!(out, "  Price: {}", record.price)?;
        writeln!(out, "  Location: {}", record.location)?;
        writeln!(out, "  Link: {}", record.link)?;
        writeln!(out, "  Posted: {}", record.posted_date)?;
        writeln!(out, "{}", "-".repeat(30))?;
        writeln!(out)?;
    }

    Ok(())
}
