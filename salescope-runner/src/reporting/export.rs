//! Export orchestrator for artifacts and reports.

use anyhow::{Context, Result};
use std::path::Path;

use crate::analysis::AnalysisResult;
use crate::config::ReportConfig;
use crate::reporting::artifacts::{ArtifactManager, ArtifactPaths};
use crate::reporting::reports::MarkdownReportGenerator;

pub fn export_run_with_report(
    output_dir: impl AsRef<Path>,
    result: &AnalysisResult,
    report_config: &ReportConfig,
    include_report: bool,
) -> Result<ArtifactPaths> {
    let manager = ArtifactManager::new(output_dir)?;
    let mut paths = manager.save_run(result)?;

    if include_report {
        let report_path = paths.run_dir.join("report.md");
        let report = MarkdownReportGenerator::new(report_config).generate(result);
        std::fs::write(&report_path, report)
            .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
        paths.report_markdown = Some(report_path);
    }

    Ok(paths)
}
