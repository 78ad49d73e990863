//! Workbook reader (xlsx, xlsm, xlsb, xls, ods) backed by calamine.
//!
//! The first non-empty row of the chosen sheet is the header row. Blank
//! header cells get positional names (`column_3`) so no data is lost.

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, DataType, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use super::ingest::IngestError;
use crate::domain::{RawRow, RawTable, RawValue};

pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable, IngestError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| IngestError::Spreadsheet(e.to_string()))?;
    read_sheet(&mut workbook, sheet)
}

/// Read a workbook already loaded into memory. The container format is
/// sniffed from the bytes.
pub fn read_workbook_bytes(bytes: &[u8], sheet: Option<&str>) -> Result<RawTable, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError::Spreadsheet(e.to_string()))?;
    read_sheet(&mut workbook, sheet)
}

fn read_sheet<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    sheet: Option<&str>,
) -> Result<RawTable, IngestError> {
    let sheet_names = workbook.sheet_names().to_vec();
    let index = match sheet {
        Some(name) => sheet_names
            .iter()
            .position(|s| s == name)
            .ok_or_else(|| IngestError::SheetNotFound(name.to_string()))?,
        None => 0,
    };
    if sheet_names.is_empty() {
        return Err(IngestError::EmptyWorkbook);
    }
    tracing::debug!(sheet = %sheet_names[index], "reading worksheet");

    let range = workbook
        .worksheet_range_at(index)
        .ok_or(IngestError::EmptyWorkbook)?
        .map_err(|e| IngestError::Spreadsheet(e.to_string()))?;

    Ok(range_to_table(&range))
}

fn range_to_table(range: &Range<Data>) -> RawTable {
    let mut rows_iter = range
        .rows()
        .skip_while(|row| row.iter().all(|cell| cell_to_raw(cell).is_blank()));

    let columns: Vec<String> = match rows_iter.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let name = cell.to_string().trim().to_string();
                if name.is_empty() {
                    format!("column_{}", i + 1)
                } else {
                    name
                }
            })
            .collect(),
        None => return RawTable::default(),
    };

    let rows: Vec<RawRow> = rows_iter
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = row.get(i).map(cell_to_raw).unwrap_or(RawValue::Null);
                    (name.clone(), value)
                })
                .collect::<RawRow>()
        })
        .filter(|row| !row.values().all(RawValue::is_blank))
        .collect();

    RawTable::new(columns, rows)
}

fn cell_to_raw(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Null,
        Data::String(s) => RawValue::Text(s.clone()),
        Data::Int(i) => RawValue::Int(*i),
        Data::Float(f) => RawValue::Float(*f),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => RawValue::DateTime(dt),
            None => RawValue::Text(cell.to_string()),
        },
        Data::Error(_) => RawValue::Null,
        other => RawValue::Text(other.to_string()),
    }
}
