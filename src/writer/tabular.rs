use std::path::Path;

use crate::models::ResultSet;
use crate::Result;

/// One header row of record field names, then one row per record.
pub fn write_csv(path: &Path, results: &ResultSet) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in results {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
