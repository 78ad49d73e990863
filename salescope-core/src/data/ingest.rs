use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{columnar, delimited, json, spreadsheet};
use crate::domain::RawTable;

/// Source file formats understood by the ingestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Csv,
    Tsv,
    Spreadsheet,
    Parquet,
    Json,
}

impl SourceFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "tsv" | "tab" => Ok(SourceFormat::Tsv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Spreadsheet),
            "parquet" | "pq" => Ok(SourceFormat::Parquet),
            "json" => Ok(SourceFormat::Json),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Tsv => "tsv",
            SourceFormat::Spreadsheet => "spreadsheet",
            SourceFormat::Parquet => "parquet",
            SourceFormat::Json => "json",
        }
    }
}

/// Parser options that depend on the source, not on cleaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadOptions {
    /// Worksheet to read from a workbook. First sheet when `None`.
    pub sheet: Option<String>,
}

/// Read any supported file into a raw table.
pub fn read_table(path: &Path, options: &ReadOptions) -> Result<RawTable, IngestError> {
    let format = SourceFormat::from_path(path)?;
    read_table_as(path, format, options)
}

/// Read a file with an explicit format, bypassing extension detection.
pub fn read_table_as(
    path: &Path,
    format: SourceFormat,
    options: &ReadOptions,
) -> Result<RawTable, IngestError> {
    tracing::info!(path = %path.display(), format = format.name(), "reading table");
    let table = match format {
        SourceFormat::Csv => delimited::read_delimited(path, b',')?,
        SourceFormat::Tsv => delimited::read_delimited(path, b'\t')?,
        SourceFormat::Spreadsheet => spreadsheet::read_workbook(path, options.sheet.as_deref())?,
        SourceFormat::Parquet => columnar::read_parquet(path)?,
        SourceFormat::Json => json::read_json(path)?,
    };
    tracing::info!(rows = table.len(), columns = table.columns.len(), "table loaded");
    Ok(table)
}

/// Parse a file's contents already held in memory. Lets a caller hash and
/// parse the exact same bytes.
pub fn read_table_bytes(
    bytes: &[u8],
    format: SourceFormat,
    options: &ReadOptions,
) -> Result<RawTable, IngestError> {
    let table = match format {
        SourceFormat::Csv => delimited::read_delimited_from(bytes, b',')?,
        SourceFormat::Tsv => delimited::read_delimited_from(bytes, b'\t')?,
        SourceFormat::Spreadsheet => {
            spreadsheet::read_workbook_bytes(bytes, options.sheet.as_deref())?
        }
        SourceFormat::Parquet => columnar::read_parquet_bytes(bytes)?,
        SourceFormat::Json => json::read_json_bytes(bytes)?,
    };
    tracing::info!(
        format = format.name(),
        rows = table.len(),
        columns = table.columns.len(),
        "table parsed from memory"
    );
    Ok(table)
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("parquet error: {0}")]
    Parquet(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("workbook has no worksheets")]
    EmptyWorkbook,

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column '{header}' is configured for both {first} and {second}")]
    ColumnConflict {
        header: String,
        first: String,
        second: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_formats_by_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a.CSV")).unwrap(), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("a.xlsx")).unwrap(), SourceFormat::Spreadsheet);
        assert_eq!(SourceFormat::from_path(Path::new("a.ods")).unwrap(), SourceFormat::Spreadsheet);
        assert_eq!(SourceFormat::from_path(Path::new("a.pq")).unwrap(), SourceFormat::Parquet);
        assert_eq!(SourceFormat::from_path(Path::new("a.json")).unwrap(), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("a.tsv")).unwrap(), SourceFormat::Tsv);
    }

    #[test]
    fn parses_delimited_and_json_bytes() {
        let opts = ReadOptions::default();
        let csv = read_table_bytes(b"date,amount\n2024-01-01,5\n", SourceFormat::Csv, &opts).unwrap();
        assert_eq!(csv.columns, vec!["date", "amount"]);
        assert_eq!(csv.len(), 1);

        let tsv = read_table_bytes(b"date\tamount\n2024-01-01\t5\n", SourceFormat::Tsv, &opts).unwrap();
        assert_eq!(tsv.columns, csv.columns);

        let json = read_table_bytes(br#"[{"date":"2024-01-01","amount":5}]"#, SourceFormat::Json, &opts)
            .unwrap();
        assert_eq!(json.len(), 1);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = SourceFormat::from_path(Path::new("sales.pdf")).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(ref e) if e == "pdf"));
        assert!(SourceFormat::from_path(Path::new("noext")).is_err());
    }
}
