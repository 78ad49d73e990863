//! Artifact manager for persisting analysis outputs.

mod records;
mod summary;
mod tables;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis::AnalysisResult;

/// Artifact paths returned after export.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub run_dir: PathBuf,
    pub summary_json: PathBuf,
    pub sales_by_day_csv: PathBuf,
    pub payment_methods_csv: PathBuf,
    pub weekdays_csv: PathBuf,
    /// Only written when the data carries categories.
    pub categories_csv: Option<PathBuf>,
    pub records_csv: PathBuf,
    pub dropped_rows_csv: PathBuf,
    pub report_markdown: Option<PathBuf>,
}

/// Manages writing all artifacts for a run.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)
            .context("Failed to create artifact output directory")?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save complete run artifacts under `<output_dir>/<run_id>/`.
    pub fn save_run(&self, result: &AnalysisResult) -> Result<ArtifactPaths> {
        let run_dir = self.output_dir.join(&result.run_id.0);
        std::fs::create_dir_all(&run_dir)
            .context("Failed to create run artifact directory")?;

        let summary_json = run_dir.join("summary.json");
        summary::write_summary_json(&summary_json, result)?;

        let summary_data = &result.summary;

        let sales_by_day_csv = run_dir.join("sales_by_day.csv");
        tables::write_sales_by_day_csv(&sales_by_day_csv, summary_data)?;

        let payment_methods_csv = run_dir.join("payment_methods.csv");
        tables::write_payment_methods_csv(&payment_methods_csv, summary_data)?;

        let weekdays_csv = run_dir.join("weekdays.csv");
        tables::write_weekdays_csv(&weekdays_csv, summary_data)?;

        let categories_csv = if summary_data.category_breakdown().is_empty() {
            None
        } else {
            let path = run_dir.join("categories.csv");
            tables::write_categories_csv(&path, summary_data)?;
            Some(path)
        };

        let records_csv = run_dir.join("records.csv");
        records::write_records_csv(&records_csv, &result.records)?;

        let dropped_rows_csv = run_dir.join("dropped_rows.csv");
        records::write_dropped_rows_csv(&dropped_rows_csv, &result.drops)?;

        info!(run_id = %result.run_id, dir = %run_dir.display(), "saved artifacts");

        Ok(ArtifactPaths {
            run_dir,
            summary_json,
            sales_by_day_csv,
            payment_methods_csv,
            weekdays_csv,
            categories_csv,
            records_csv,
            dropped_rows_csv,
            report_markdown: None,
        })
    }
}
