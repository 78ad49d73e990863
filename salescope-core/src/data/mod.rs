//! File parsing and column resolution.
//!
//! ```text
//!  .csv / .tsv / .xlsx / .ods / .parquet / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  ingest   │  parse file → RawTable (headers as found)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ columns   │  headers → canonical fields → Vec<RawRow>
//!   └──────────┘
//! ```

pub mod columnar;
pub mod columns;
pub mod delimited;
pub mod ingest;
pub mod json;
pub mod spreadsheet;

pub use columns::{CanonicalField, ColumnMapping, ColumnOverrides, ColumnResolver, MatchKind};
pub use ingest::{read_table, read_table_as, read_table_bytes, IngestError, ReadOptions, SourceFormat};
