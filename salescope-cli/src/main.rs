//! SaleScope CLI: analyze sales files, preview raw rows, inspect column detection.
//!
//! Commands:
//! - `analyze`: clean and summarize a sales file, print highlights, save artifacts
//! - `preview`: print the first rows of a file as parsed, before cleaning
//! - `columns`: show which source headers map to date, amount, payment method, category

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use salescope_core::data::{read_table, MatchKind, ReadOptions};
use salescope_core::domain::{RawTable, RawValue};
use salescope_runner::reporting::format::{format_amount, weekday_name};
use salescope_runner::{
    analyze_file, export_run_with_report, AnalysisConfig, AnalysisResult, SummaryHighlights,
};

#[derive(Parser)]
#[command(
    name = "salescope",
    version,
    about = "SaleScope CLI: sales data cleaning and summary analytics"
)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean and summarize a sales file, then save artifacts.
    Analyze {
        /// Sales file (.csv, .tsv, .xlsx, .xls, .ods, .parquet, .json).
        file: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for run artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Also write a Markdown report.
        #[arg(long, default_value_t = false)]
        report: bool,

        /// Worksheet name for spreadsheet files. Defaults to the first sheet.
        #[arg(long)]
        sheet: Option<String>,

        /// Print the full summary as JSON instead of the text highlights.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the first rows of a file as parsed, before cleaning.
    Preview {
        file: PathBuf,

        /// Number of rows to show.
        #[arg(long, default_value_t = 10)]
        rows: usize,

        /// Worksheet name for spreadsheet files.
        #[arg(long)]
        sheet: Option<String>,
    },
    /// Show the detected column mapping for a file.
    Columns {
        file: PathBuf,

        /// Path to a TOML config file with column overrides.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Worksheet name for spreadsheet files.
        #[arg(long)]
        sheet: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            file,
            config,
            output_dir,
            report,
            sheet,
            json,
        } => run_analyze(&file, config.as_deref(), &output_dir, report, sheet, json),
        Commands::Preview { file, rows, sheet } => run_preview(&file, rows, sheet),
        Commands::Columns {
            file,
            config,
            sheet,
        } => run_columns(&file, config.as_deref(), sheet),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("salescope=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("salescope=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>, sheet: Option<String>) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(p) => AnalysisConfig::from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display()))?,
        None => AnalysisConfig::default(),
    };
    if sheet.is_some() {
        config.input.sheet = sheet;
    }
    tracing::debug!(?config, "loaded config");
    Ok(config)
}

fn run_analyze(
    file: &Path,
    config_path: Option<&Path>,
    output_dir: &Path,
    report: bool,
    sheet: Option<String>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, sheet)?;
    let result = analyze_file(file, &config)
        .with_context(|| format!("Failed to analyze {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result, &config);
    }

    let paths = export_run_with_report(output_dir, &result, &config.report, report)?;
    if json {
        eprintln!("Artifacts saved to: {}", paths.run_dir.display());
    } else {
        println!("Artifacts saved to: {}", paths.run_dir.display());
        if let Some(report_path) = &paths.report_markdown {
            println!("Report:             {}", report_path.display());
        }
    }

    Ok(())
}

fn print_summary(result: &AnalysisResult, config: &AnalysisConfig) {
    let prefix = &config.report.currency_prefix;
    let highlights = SummaryHighlights::from_result(result, config.report.top_days);

    println!();
    println!("=== Sales Summary ===");
    println!("Source:         {}", result.source.path);
    println!(
        "Rows:           {} read, {} kept, {} dropped",
        result.clean.input_rows, result.clean.kept, result.clean.dropped
    );
    println!("Run ID:         {}", result.run_id);
    println!();
    println!("Total Sales:    {}", format_amount(highlights.total_sales, prefix));
    println!("Average Sale:   {}", format_amount(highlights.average_sale, prefix));
    println!(
        "Top Category:   {}",
        highlights.top_category.as_deref().unwrap_or("n/a")
    );

    if !highlights.payment_shares.is_empty() {
        println!();
        println!("--- Payment Methods ---");
        for share in &highlights.payment_shares {
            println!(
                "{:<16} {:>6} {:>6.1}%  {}",
                share.method,
                share.transactions,
                share.share_pct,
                format_amount(share.total, prefix)
            );
        }
    }

    if !highlights.top_days.is_empty() {
        println!();
        println!("--- Most Active Days ---");
        for (date, sales) in &highlights.top_days {
            println!(
                "{}  {:<10} {}",
                date,
                weekday_name(date.weekday()),
                format_amount(*sales, prefix)
            );
        }
    }

    for warn in &result.warnings {
        println!();
        println!("WARNING: {warn}");
    }
    println!();
}

fn run_preview(file: &Path, rows: usize, sheet: Option<String>) -> Result<()> {
    let table = read_table(file, &ReadOptions { sheet })
        .with_context(|| format!("Failed to read {}", file.display()))?;

    println!(
        "{}: {} rows, {} columns",
        file.display(),
        table.len(),
        table.columns.len()
    );
    println!();
    print_table(&table, rows);
    Ok(())
}

const MAX_CELL_WIDTH: usize = 24;

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{cut}…")
    }
}

fn print_table(table: &RawTable, rows: usize) {
    let head = table.head(rows);
    let cells: Vec<Vec<String>> = head
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .map(|col| truncate(&row.get(col).unwrap_or(&RawValue::Null).to_string()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(truncate(col).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("{:<w$}", truncate(col), w = *w))
        .collect();
    println!("{}", header.join("  "));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect();
        println!("{}", line.join("  "));
    }
    if table.len() > head.len() {
        println!("... {} more rows", table.len() - head.len());
    }
}

fn run_columns(file: &Path, config_path: Option<&Path>, sheet: Option<String>) -> Result<()> {
    let config = load_config(config_path, sheet)?;
    let table = read_table(file, &config.input)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mapping = config
        .resolver()
        .resolve(&table.columns)
        .context("Column detection failed")?;

    println!("{:<16} {:<28} {}", "Field", "Source Column", "Match");
    println!("{}", "-".repeat(60));
    for m in &mapping.matches {
        let kind = match m.kind {
            MatchKind::Configured => "configured".to_string(),
            MatchKind::Exact => "exact".to_string(),
            MatchKind::Fuzzy { score } => format!("fuzzy ({score:.2})"),
        };
        println!("{:<16} {:<28} {}", m.field.key(), m.source, kind);
    }

    let unused: Vec<&String> = table
        .columns
        .iter()
        .filter(|c| !mapping.matches.iter().any(|m| &m.source == *c))
        .collect();
    if !unused.is_empty() {
        println!();
        println!(
            "Ignored: {}",
            unused.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
        );
    }
    Ok(())
}
