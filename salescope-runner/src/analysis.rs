//! Single-file analysis: read, fingerprint, resolve columns, clean, summarize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use salescope_core::data::json::table_from_json;
use salescope_core::data::{read_table_bytes, ColumnMapping, IngestError, SourceFormat};
use salescope_core::domain::{RawTable, SaleRecord, Summary};
use salescope_core::fingerprint::{DatasetHash, RunId};
use salescope_core::pipeline::{CleanOutcome, DataQualityWarning, DroppedRow};

use crate::config::{AnalysisConfig, ConfigError};

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("input error: {0}")]
    Ingest(#[from] IngestError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where the rows came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// File path, or a caller-chosen label for in-memory input.
    pub path: String,
    pub format: SourceFormat,
    pub rows: usize,
    pub columns: Vec<String>,
    pub dataset_hash: DatasetHash,
}

/// Row accounting for the cleaning stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanStats {
    pub input_rows: usize,
    pub kept: usize,
    pub dropped: usize,
    pub drop_counts: BTreeMap<String, usize>,
}

impl CleanStats {
    fn from_outcome(outcome: &CleanOutcome) -> Self {
        Self {
            input_rows: outcome.kept() + outcome.dropped(),
            kept: outcome.kept(),
            dropped: outcome.dropped(),
            drop_counts: outcome
                .drop_counts()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

/// Complete result of analyzing one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub schema_version: u32,
    pub run_id: RunId,
    pub timestamp: DateTime<Utc>,
    pub source: SourceInfo,
    pub mapping: ColumnMapping,
    pub clean: CleanStats,
    pub summary: Summary,
    pub warnings: Vec<DataQualityWarning>,
    /// Cleaned records, kept for the records export.
    #[serde(skip)]
    pub records: Vec<SaleRecord>,
    #[serde(skip)]
    pub drops: Vec<DroppedRow>,
}

impl AnalysisResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Analyze a sales file on disk.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;
    let format = SourceFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| AnalysisError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let dataset_hash = DatasetHash::of_bytes(&bytes);
    let table = read_table_bytes(&bytes, format, &config.input)?;
    drop(bytes);
    info!(
        path = %path.display(),
        format = format.name(),
        rows = table.len(),
        hash = dataset_hash.short(),
        "read sales table"
    );

    analyze_rows(table, path.display().to_string(), format, dataset_hash, config)
}

/// Analyze a JSON document already in memory: an array of row objects.
pub fn analyze_json(
    label: &str,
    input: &JsonValue,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;
    let table = table_from_json(input)?;
    let dataset_hash = DatasetHash::of_bytes(input.to_string().as_bytes());
    analyze_rows(table, label.to_string(), SourceFormat::Json, dataset_hash, config)
}

/// Analyze an already-parsed table. No I/O.
pub fn analyze_rows(
    table: RawTable,
    path: String,
    format: SourceFormat,
    dataset_hash: DatasetHash,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    // With no rows there is nothing to map; the pipeline still reports an
    // empty dataset instead of a missing column.
    let mapping = if table.is_empty() {
        debug!(columns = table.columns.len(), "no rows, skipping column resolution");
        ColumnMapping::default()
    } else {
        config.resolver().resolve(&table.columns)?
    };
    let rows = mapping.apply(&table);

    let output = config.pipeline().run(&rows);
    let clean = CleanStats::from_outcome(&output.clean);
    let run_id = RunId::new(&dataset_hash, &config.canonical_json()?);

    info!(
        run_id = %run_id,
        kept = clean.kept,
        dropped = clean.dropped,
        "analysis complete"
    );

    Ok(AnalysisResult {
        schema_version: SCHEMA_VERSION,
        run_id,
        timestamp: Utc::now(),
        source: SourceInfo {
            path,
            format,
            rows: table.len(),
            columns: table.columns,
            dataset_hash,
        },
        mapping,
        clean,
        summary: output.summary,
        warnings: output.warnings,
        records: output.clean.records,
        drops: output.clean.drops,
    })
}
