//! Parquet reader backed by polars.

use chrono::{DateTime, NaiveDate};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use super::ingest::IngestError;
use crate::domain::{RawRow, RawTable, RawValue};

pub fn read_parquet(path: &Path) -> Result<RawTable, IngestError> {
    let df = LazyFrame::scan_parquet(path, Default::default())
        .and_then(|lf| lf.collect())
        .map_err(|e| IngestError::Parquet(e.to_string()))?;
    dataframe_to_table(&df)
}

/// Read a Parquet file already loaded into memory.
pub fn read_parquet_bytes(bytes: &[u8]) -> Result<RawTable, IngestError> {
    let df = ParquetReader::new(Cursor::new(bytes))
        .finish()
        .map_err(|e| IngestError::Parquet(e.to_string()))?;
    dataframe_to_table(&df)
}

/// Convert an in-memory frame into raw rows, cell by cell.
pub fn dataframe_to_table(df: &DataFrame) -> Result<RawTable, IngestError> {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows: Vec<RawRow> = vec![RawRow::new(); df.height()];
    for (name, column) in columns.iter().zip(df.get_columns()) {
        let series = column.as_materialized_series();
        for (i, row) in rows.iter_mut().enumerate() {
            let value = series
                .get(i)
                .map_err(|e| IngestError::Parquet(e.to_string()))?;
            row.insert(name.clone(), any_to_raw(&value));
        }
    }

    Ok(RawTable::new(columns, rows))
}

fn any_to_raw(value: &AnyValue) -> RawValue {
    match value {
        AnyValue::Null => RawValue::Null,
        AnyValue::Boolean(b) => RawValue::Bool(*b),
        AnyValue::String(s) => RawValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => RawValue::Text(s.to_string()),
        AnyValue::Int8(v) => RawValue::Int(*v as i64),
        AnyValue::Int16(v) => RawValue::Int(*v as i64),
        AnyValue::Int32(v) => RawValue::Int(*v as i64),
        AnyValue::Int64(v) => RawValue::Int(*v),
        AnyValue::UInt8(v) => RawValue::Int(*v as i64),
        AnyValue::UInt16(v) => RawValue::Int(*v as i64),
        AnyValue::UInt32(v) => RawValue::Int(*v as i64),
        AnyValue::UInt64(v) => match i64::try_from(*v) {
            Ok(i) => RawValue::Int(i),
            Err(_) => RawValue::Text(v.to_string()),
        },
        AnyValue::Float32(v) => RawValue::Float(*v as f64),
        AnyValue::Float64(v) => RawValue::Float(*v),
        AnyValue::Date(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(*days as i64)))
            .map(RawValue::Date)
            .unwrap_or(RawValue::Null),
        AnyValue::Datetime(v, unit, _) => {
            let dt = match unit {
                TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(*v)),
                TimeUnit::Microseconds => DateTime::from_timestamp_micros(*v),
                TimeUnit::Milliseconds => DateTime::from_timestamp_millis(*v),
            };
            dt.map(|dt| RawValue::DateTime(dt.naive_utc()))
                .unwrap_or(RawValue::Null)
        }
        other => RawValue::Text(other.to_string()),
    }
}
