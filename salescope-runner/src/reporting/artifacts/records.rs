//! Row-level exports: cleaned records and dropped rows (CSV).

use anyhow::{Context, Result};
use std::path::Path;

use salescope_core::domain::SaleRecord;
use salescope_core::pipeline::DroppedRow;

pub fn write_records_csv(path: &Path, records: &[SaleRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create records CSV {}", path.display()))?;

    writer.write_record(["date", "amount", "payment_method", "category"])?;
    for record in records {
        writer.write_record([
            record.date.to_string(),
            record.amount.to_string(),
            record.payment_method.clone(),
            record.category.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// `row` is the zero-based position in the parsed input.
pub fn write_dropped_rows_csv(path: &Path, drops: &[DroppedRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create dropped rows CSV {}", path.display()))?;

    writer.write_record(["row", "reason", "detail"])?;
    for drop in drops {
        writer.write_record([
            drop.index.to_string(),
            drop.reason.kind().to_string(),
            drop.reason.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
