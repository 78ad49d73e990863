//! Sales data pipeline: raw rows → cleaned sale records → summary.
//!
//! ```text
//!   Vec<RawRow>  ──clean──►  CleanOutcome { records, drops }  ──summarize──►  Summary
//! ```
//!
//! Both stages are pure functions of their input and the pipeline's
//! `CleaningOptions`. Nothing is cached between calls.

pub mod clean;
pub mod parse;
pub mod summarize;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::domain::{RawRow, RawValue, SaleRecord, Summary};

pub use clean::CleanOutcome;

/// Canonical column names the pipeline reads from each raw row.
pub mod fields {
    pub const DATE: &str = "date";
    pub const AMOUNT: &str = "amount";
    pub const PAYMENT_METHOD: &str = "payment_method";
    pub const CATEGORY: &str = "category";
}

/// Explicit cleaning heuristics. Nothing beyond these is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleaningOptions {
    /// chrono format strings tried in order. RFC 3339 is always tried last.
    pub date_formats: Vec<String>,
    /// Substrings removed from textual amounts before parsing (e.g. `"$"`, `"₹"`).
    pub currency_symbols: Vec<String>,
    /// Grouping character removed from textual amounts.
    pub thousands_separator: Option<char>,
    /// Label given to sales with no payment method.
    pub unknown_payment_label: String,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".into(),
                "%Y/%m/%d".into(),
                "%d.%m.%Y".into(),
                "%Y-%m-%d %H:%M:%S".into(),
                "%Y-%m-%dT%H:%M:%S".into(),
            ],
            currency_symbols: Vec::new(),
            thousands_separator: None,
            unknown_payment_label: "Unknown".into(),
        }
    }
}

/// Why a raw row was excluded from analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DropReason {
    #[error("missing date")]
    MissingDate,
    #[error("unparseable date '{0}'")]
    InvalidDate(String),
    #[error("missing amount")]
    MissingAmount,
    #[error("unparseable amount '{0}'")]
    InvalidAmount(String),
    #[error("negative amount {0}")]
    NegativeAmount(Decimal),
    #[error("amount {0} exceeds the {max} ceiling", max = parse::MAX_AMOUNT)]
    AmountOutOfRange(Decimal),
}

impl DropReason {
    /// Stable short name, used for grouping drop counts.
    pub fn kind(&self) -> &'static str {
        match self {
            DropReason::MissingDate => "missing_date",
            DropReason::InvalidDate(_) => "invalid_date",
            DropReason::MissingAmount => "missing_amount",
            DropReason::InvalidAmount(_) => "invalid_amount",
            DropReason::NegativeAmount(_) => "negative_amount",
            DropReason::AmountOutOfRange(_) => "amount_out_of_range",
        }
    }
}

/// A dropped row: its zero-based position in the input and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRow {
    pub index: usize,
    pub reason: DropReason,
}

/// Non-fatal data quality findings surfaced alongside a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    RowsDropped { count: usize },
    EmptyDataset,
}

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataQualityWarning::RowsDropped { count } => {
                write!(f, "removed {count} row(s) with missing or invalid data")
            }
            DataQualityWarning::EmptyDataset => write!(f, "no valid data left after cleaning"),
        }
    }
}

/// The only fatal pipeline error: input that is not a sequence of rows at all.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Everything one `run` produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub clean: CleanOutcome,
    pub summary: Summary,
    pub warnings: Vec<DataQualityWarning>,
}

/// Stateless clean-then-summarize transformation.
#[derive(Debug, Clone, Default)]
pub struct SalesDataPipeline {
    options: CleaningOptions,
}

impl SalesDataPipeline {
    pub fn new(options: CleaningOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CleaningOptions {
        &self.options
    }

    /// Validate rows, dropping (and recording) those without a usable date or amount.
    pub fn clean(&self, rows: &[RawRow]) -> CleanOutcome {
        clean::clean_rows(rows, &self.options)
    }

    /// Aggregate cleaned records. Never fails; an empty slice yields an all-zero summary.
    pub fn summarize(&self, records: &[SaleRecord]) -> Summary {
        summarize::summarize_records(records)
    }

    /// Clean and summarize in one pass, collecting data quality warnings.
    pub fn run(&self, rows: &[RawRow]) -> PipelineOutput {
        let clean = self.clean(rows);
        let summary = self.summarize(&clean.records);

        let mut warnings = Vec::new();
        if clean.dropped() > 0 {
            warnings.push(DataQualityWarning::RowsDropped {
                count: clean.dropped(),
            });
        }
        if clean.records.is_empty() {
            warnings.push(DataQualityWarning::EmptyDataset);
        }
        for warning in &warnings {
            tracing::warn!(%warning, "data quality");
        }

        PipelineOutput {
            clean,
            summary,
            warnings,
        }
    }

    /// Run over a JSON document that must be an array of objects.
    ///
    /// Any other shape is rejected before cleaning starts, so no partial
    /// summary is ever produced for structurally invalid input.
    pub fn run_json(&self, input: &JsonValue) -> Result<PipelineOutput, PipelineError> {
        let rows = rows_from_json(input)?;
        Ok(self.run(&rows))
    }
}

/// Convert a JSON array of objects into raw rows.
pub fn rows_from_json(input: &JsonValue) -> Result<Vec<RawRow>, PipelineError> {
    let items = input.as_array().ok_or_else(|| {
        PipelineError::InvalidInput(format!(
            "expected an array of row objects, got {}",
            json_kind(input)
        ))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let obj = item.as_object().ok_or_else(|| {
                PipelineError::InvalidInput(format!(
                    "row {i} is {}, expected an object",
                    json_kind(item)
                ))
            })?;
            Ok(obj
                .iter()
                .map(|(k, v)| (k.clone(), RawValue::from_json(v)))
                .collect())
        })
        .collect()
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn run_warns_about_drops_and_empty_data() {
        let pipeline = SalesDataPipeline::default();
        let output = pipeline
            .run_json(&json!([{ "date": "nope", "amount": 1, "payment_method": "card" }]))
            .unwrap();

        assert_eq!(output.clean.dropped(), 1);
        assert!(output.summary.is_empty());
        assert_eq!(
            output.warnings,
            vec![
                DataQualityWarning::RowsDropped { count: 1 },
                DataQualityWarning::EmptyDataset
            ]
        );
    }

    #[test]
    fn clean_input_has_no_warnings() {
        let pipeline = SalesDataPipeline::default();
        let output = pipeline
            .run_json(&json!([{ "date": "2024-01-01", "amount": 5, "payment_method": "cash" }]))
            .unwrap();
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn rejects_non_array_and_non_object_rows() {
        assert!(matches!(rows_from_json(&json!(42)), Err(PipelineError::InvalidInput(_))));
        assert!(matches!(
            rows_from_json(&json!({ "date": "2024-01-01" })),
            Err(PipelineError::InvalidInput(_))
        ));
        let err = rows_from_json(&json!([{ "amount": 1 }, "oops"])).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn drop_reason_kinds_are_stable() {
        assert_eq!(DropReason::MissingDate.kind(), "missing_date");
        assert_eq!(DropReason::NegativeAmount(Decimal::ONE).kind(), "negative_amount");
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: CleaningOptions = serde_json::from_value(json!({ "currency_symbols": ["$"] })).unwrap();
        assert_eq!(opts.currency_symbols, vec!["$".to_string()]);
        assert_eq!(opts.unknown_payment_label, "Unknown");
        assert_eq!(opts.date_formats.len(), 5);
    }
}
