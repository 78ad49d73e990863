//! Records-oriented JSON reader: `[{ "date": ..., "amount": ... }, ...]`.

use serde_json::Value as JsonValue;
use std::path::Path;

use super::ingest::IngestError;
use crate::domain::RawTable;
use crate::pipeline::{rows_from_json, PipelineError};

pub fn read_json(path: &Path) -> Result<RawTable, IngestError> {
    read_json_bytes(&std::fs::read(path)?)
}

pub fn read_json_bytes(bytes: &[u8]) -> Result<RawTable, IngestError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    table_from_json(&root)
}

/// Build a table from a parsed JSON document. Column order is the order in
/// which keys are first seen across rows.
pub fn table_from_json(root: &JsonValue) -> Result<RawTable, IngestError> {
    let rows = rows_from_json(root).map_err(|e| match e {
        PipelineError::InvalidInput(msg) => IngestError::InvalidInput(msg),
    })?;

    let mut columns: Vec<String> = Vec::new();
    if let Some(items) = root.as_array() {
        for obj in items.iter().filter_map(|item| item.as_object()) {
            for key in obj.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    Ok(RawTable::new(columns, rows))
}
