//! TOML analysis configuration.
//!
//! Every field has a default, so an empty file is a valid config:
//!
//! ```toml
//! [input]
//! sheet = "January"
//!
//! [columns]
//! fuzzy_cutoff = 0.6
//!
//! [columns.names]
//! amount = "Net Sales"
//!
//! [cleaning]
//! date_formats = ["%Y-%m-%d", "%d/%m/%Y"]
//! currency_symbols = ["₹", "$"]
//! thousands_separator = ","
//! unknown_payment_label = "Unknown"
//!
//! [report]
//! top_days = 5
//! currency_prefix = "₹"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use salescope_core::data::columns::DEFAULT_CUTOFF;
use salescope_core::data::{ColumnOverrides, ColumnResolver, ReadOptions};
use salescope_core::pipeline::{CleaningOptions, SalesDataPipeline};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Header resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnsConfig {
    /// Minimum similarity for fuzzy header matches, in `(0, 1]`.
    pub fuzzy_cutoff: f64,
    /// Explicit header names that bypass detection.
    pub names: ColumnOverrides,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            fuzzy_cutoff: DEFAULT_CUTOFF,
            names: ColumnOverrides::default(),
        }
    }
}

/// Presentation settings for console output and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// How many of the most active days to list.
    pub top_days: usize,
    /// Printed before every amount, e.g. `"$"`.
    pub currency_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_days: 5,
            currency_prefix: String::new(),
        }
    }
}

/// Complete configuration for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub input: ReadOptions,
    pub columns: ColumnsConfig,
    pub cleaning: CleaningOptions,
    pub report: ReportConfig,
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cutoff = self.columns.fuzzy_cutoff;
        if !(cutoff > 0.0 && cutoff <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "columns.fuzzy_cutoff must be in (0, 1], got {cutoff}"
            )));
        }
        if self.cleaning.date_formats.is_empty() {
            return Err(ConfigError::Invalid(
                "cleaning.date_formats must list at least one format".into(),
            ));
        }
        if self.cleaning.unknown_payment_label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "cleaning.unknown_payment_label must not be blank".into(),
            ));
        }
        if self.report.top_days == 0 {
            return Err(ConfigError::Invalid("report.top_days must be at least 1".into()));
        }
        Ok(())
    }

    /// Settings that affect results, as canonical JSON. Presentation
    /// settings are excluded so they don't change the run id.
    pub fn canonical_json(&self) -> Result<String, ConfigError> {
        let value = serde_json::json!({
            "input": self.input,
            "columns": self.columns,
            "cleaning": self.cleaning,
        });
        serde_json::to_string(&value).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn resolver(&self) -> ColumnResolver {
        ColumnResolver::new(self.columns.names.clone(), self.columns.fuzzy_cutoff)
    }

    pub fn pipeline(&self) -> SalesDataPipeline {
        SalesDataPipeline::new(self.cleaning.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = AnalysisConfig::from_toml("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.report.top_days, 5);
        assert_eq!(config.columns.fuzzy_cutoff, DEFAULT_CUTOFF);
    }

    #[test]
    fn parses_full_config() {
        let toml_str = r#"
[input]
sheet = "Q1"

[columns]
fuzzy_cutoff = 0.75

[columns.names]
amount = "Net Sales"

[cleaning]
currency_symbols = ["$"]
thousands_separator = ","

[report]
top_days = 3
currency_prefix = "$"
"#;
        let config = AnalysisConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.input.sheet.as_deref(), Some("Q1"));
        assert_eq!(config.columns.fuzzy_cutoff, 0.75);
        assert_eq!(config.columns.names.amount.as_deref(), Some("Net Sales"));
        assert_eq!(config.cleaning.thousands_separator, Some(','));
        assert_eq!(config.cleaning.date_formats.len(), 5);
        assert_eq!(config.report.currency_prefix, "$");
    }

    #[test]
    fn rejects_out_of_range_cutoff() {
        let err = AnalysisConfig::from_toml("[columns]\nfuzzy_cutoff = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_top_days_and_empty_formats() {
        assert!(AnalysisConfig::from_toml("[report]\ntop_days = 0\n").is_err());
        assert!(AnalysisConfig::from_toml("[cleaning]\ndate_formats = []\n").is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = AnalysisConfig::from_toml("[report]\ncolour = \"red\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_misspelled_nested_keys() {
        for toml in [
            "[cleaning]\ncurrency_symbol = [\"$\"]\n",
            "[columns.names]\namout = \"Net\"\n",
            "[input]\nsheets = \"Q1\"\n",
        ] {
            let err = AnalysisConfig::from_toml(toml).unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)), "accepted: {toml}");
        }
    }

    #[test]
    fn canonical_json_ignores_presentation() {
        let a = AnalysisConfig::default();
        let mut b = AnalysisConfig::default();
        b.report.currency_prefix = "€".into();
        assert_eq!(a.canonical_json().unwrap(), b.canonical_json().unwrap());

        b.cleaning.currency_symbols = vec!["€".into()];
        assert_ne!(a.canonical_json().unwrap(), b.canonical_json().unwrap());
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salescope.toml");
        std::fs::write(&path, "[report]\ntop_days = 2\n").unwrap();
        let config = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(config.report.top_days, 2);

        let missing = AnalysisConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
