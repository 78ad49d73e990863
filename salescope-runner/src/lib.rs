//! SaleScope Runner: analysis orchestration, configuration, artifact export.
//!
//! This crate builds on `salescope-core` to provide:
//! - TOML analysis configuration
//! - Single-file analysis with dataset fingerprinting and run ids
//! - Artifact export (JSON summary, CSV breakdowns, row-level CSVs)
//! - Markdown reports

pub mod analysis;
pub mod config;
pub mod reporting;

pub use analysis::{
    analyze_file, analyze_json, analyze_rows, AnalysisError, AnalysisResult, CleanStats,
    SourceInfo, SCHEMA_VERSION,
};
pub use config::{AnalysisConfig, ColumnsConfig, ConfigError, ReportConfig};
pub use reporting::{
    export_run_with_report, ArtifactManager, ArtifactPaths, MarkdownReportGenerator,
    SummaryHighlights,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn analysis_result_is_send_sync() {
        assert_send::<AnalysisResult>();
        assert_sync::<AnalysisResult>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<AnalysisConfig>();
        assert_sync::<AnalysisConfig>();
        assert_send::<ReportConfig>();
        assert_sync::<ReportConfig>();
    }

    #[test]
    fn artifact_manager_is_send_sync() {
        assert_send::<ArtifactManager>();
        assert_sync::<ArtifactManager>();
    }
}
