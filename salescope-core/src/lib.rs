//! SaleScope Core: sales domain types, the cleaning/aggregation pipeline,
//! and the file parsers that feed it.
//!
//! - Domain types (raw rows, sale records, summaries)
//! - `SalesDataPipeline`: clean → summarize, pure and stateless
//! - Parsers for CSV/TSV, spreadsheets, Parquet and JSON
//! - Header resolution onto canonical fields
//! - Dataset and run fingerprints

pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod pipeline;

pub use domain::{RawRow, RawTable, RawValue, SaleRecord, Summary};
pub use pipeline::{
    CleanOutcome, CleaningOptions, DataQualityWarning, DropReason, PipelineError,
    PipelineOutput, SalesDataPipeline,
};
