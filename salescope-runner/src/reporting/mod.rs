//! Reporting and artifact export pipeline.

pub mod artifacts;
pub mod export;
pub mod format;
pub mod reports;

pub use artifacts::{ArtifactManager, ArtifactPaths};
pub use export::export_run_with_report;
pub use reports::{MarkdownReportGenerator, SummaryHighlights};
