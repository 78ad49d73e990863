//! Aggregate tables (CSV), one file per summary breakdown.

use anyhow::{Context, Result};
use chrono::Datelike;
use std::path::Path;

use salescope_core::domain::Summary;

use crate::reporting::format::weekday_name;

fn create(path: &Path, what: &str) -> Result<csv::Writer<std::fs::File>> {
    csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {what} CSV {}", path.display()))
}

pub fn write_sales_by_day_csv(path: &Path, summary: &Summary) -> Result<()> {
    let mut writer = create(path, "daily sales")?;
    writer.write_record(["date", "weekday", "sales"])?;
    for (date, total) in summary.sales_by_day() {
        writer.write_record([
            date.to_string(),
            weekday_name(date.weekday()).to_string(),
            total.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Methods ordered by transaction count, busiest first.
pub fn write_payment_methods_csv(path: &Path, summary: &Summary) -> Result<()> {
    let mut writer = create(path, "payment methods")?;
    writer.write_record(["payment_method", "transactions", "share_pct", "total"])?;

    let mut methods: Vec<(&String, &usize)> = summary.payment_method_breakdown().iter().collect();
    methods.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (method, count) in methods {
        let total = summary
            .payment_method_totals()
            .get(method)
            .copied()
            .unwrap_or_default();
        writer.write_record([
            method.clone(),
            count.to_string(),
            format!("{:.2}", summary.payment_share_pct(method)),
            total.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_weekdays_csv(path: &Path, summary: &Summary) -> Result<()> {
    let mut writer = create(path, "weekday activity")?;
    writer.write_record(["weekday", "transactions"])?;
    for day in summary.weekday_activity() {
        writer.write_record([weekday_name(day.weekday).to_string(), day.transactions.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_categories_csv(path: &Path, summary: &Summary) -> Result<()> {
    let mut writer = create(path, "categories")?;
    writer.write_record(["category", "transactions", "total", "average"])?;
    for (category, stats) in summary.category_breakdown() {
        writer.write_record([
            category.clone(),
            stats.transactions.to_string(),
            stats.total.to_string(),
            stats.average.round_dp(2).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
