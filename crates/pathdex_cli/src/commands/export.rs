//! Export command.

use super::load::{load, Document};
use pathdex_core::{IndexConfig, PageIndex};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Separator between several values at one path.
pub const VALUE_SEPARATOR: &str = ";";

/// Run the export command.
pub fn run(input: &Path, output: &Path, key_field: &str) -> Result<(), Box<dyn std::error::Error>> {
    let index = load(input, key_field, IndexConfig::new())?;

    info!("Writing CSV to {:?}", output);
    let file = File::create(output)?;
    let rows = write_csv(&index, file)?;

    println!("✓ Exported {} documents", rows);
    println!("  Path: {:?}", output);
    println!("  Columns: {}", index.paths().len() + 1);

    Ok(())
}

/// Writes a header of `key` and every indexed path, then one row per
/// document in handle order. Returns the number of rows written.
pub fn write_csv<W: Write>(index: &PageIndex<Document>, writer: W) -> Result<usize, csv::Error> {
    let paths = index.paths();
    let mut out = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(paths.len() + 1);
    header.push("key".to_string());
    header.extend(paths.iter().cloned());
    out.write_record(&header)?;

    let rows = index.field_rows();
    for (handle, fields) in &rows {
        let key = index.get(*handle).map(Document::key).unwrap_or_default();
        let mut record = Vec::with_capacity(paths.len() + 1);
        record.push(key.to_string());
        for path in &paths {
            record.push(
                fields
                    .get(path)
                    .map(|values| values.join(VALUE_SEPARATOR))
                    .unwrap_or_default(),
            );
        }
        out.write_record(&record)?;
    }

    out.flush()?;
    Ok(rows.len())
}
