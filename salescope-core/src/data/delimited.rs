//! CSV/TSV reader. Every non-empty cell is kept as text; empty cells become `Null`.

use std::io::Read;
use std::path::Path;

use super::ingest::IngestError;
use crate::domain::{RawRow, RawTable, RawValue};

pub fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable, IngestError> {
    let file = std::fs::File::open(path)?;
    read_delimited_from(file, delimiter)
}

/// Parse delimited text from any reader. Ragged rows are tolerated: missing
/// trailing cells read as `Null`, extra cells are ignored.
pub fn read_delimited_from<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row: RawRow = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = match record.get(i) {
                    Some(cell) if !cell.trim().is_empty() => RawValue::Text(cell.to_string()),
                    _ => RawValue::Null,
                };
                (name.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable::new(columns, rows))
}
