//! Markdown report generator.

use chrono::Datelike;

use super::SummaryHighlights;
use crate::analysis::AnalysisResult;
use crate::config::ReportConfig;
use crate::reporting::format::{format_amount, weekday_name};

pub struct MarkdownReportGenerator {
    top_days: usize,
    currency_prefix: String,
}

impl MarkdownReportGenerator {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            top_days: config.top_days,
            currency_prefix: config.currency_prefix.clone(),
        }
    }

    fn money(&self, value: rust_decimal::Decimal) -> String {
        format_amount(value, &self.currency_prefix)
    }

    pub fn generate(&self, result: &AnalysisResult) -> String {
        let highlights = SummaryHighlights::from_result(result, self.top_days);
        let summary = &result.summary;

        let mut report = format!(
            "# Sales Analysis Report\n\n\
Run ID: `{}`\n\
Source: `{}` ({}, {} rows)\n\
Generated: {}\n\n\
## Summary\n\
- Transactions: {}\n\
- Total Sales: {}\n\
- Average Sale: {}\n\
- Top Category: {}\n",
            result.run_id,
            result.source.path,
            result.source.format.name(),
            result.source.rows,
            result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            highlights.records,
            self.money(highlights.total_sales),
            self.money(highlights.average_sale),
            highlights.top_category.as_deref().unwrap_or("n/a"),
        );

        // Data quality section
        if highlights.dropped_rows > 0 || !result.warnings.is_empty() {
            report.push_str("\n## Data Quality\n\n");
            for warning in &result.warnings {
                report.push_str(&format!("- **Warning**: {}\n", warning));
            }
            if !result.clean.drop_counts.is_empty() {
                report.push_str("\n| Reason | Rows |\n");
                report.push_str("|--------|------|\n");
                for (reason, count) in &result.clean.drop_counts {
                    report.push_str(&format!("| {} | {} |\n", reason, count));
                }
            }
        }

        if summary.is_empty() {
            report.push_str("\nNo valid sales remained after cleaning.\n");
            return report;
        }

        report.push_str("\n## Payment Methods\n\n");
        report.push_str("| Method | Transactions | Share | Sales |\n");
        report.push_str("|--------|--------------|-------|-------|\n");
        for share in &highlights.payment_shares {
            report.push_str(&format!(
                "| {} | {} | {:.1}% | {} |\n",
                share.method,
                share.transactions,
                share.share_pct,
                self.money(share.total)
            ));
        }

        report.push_str(&format!("\n## Most Active Days (top {})\n\n", self.top_days));
        report.push_str("| Date | Weekday | Sales |\n");
        report.push_str("|------|---------|-------|\n");
        for (date, sales) in &highlights.top_days {
            report.push_str(&format!(
                "| {} | {} | {} |\n",
                date,
                weekday_name(date.weekday()),
                self.money(*sales)
            ));
        }

        report.push_str("\n## Weekday Activity\n\n");
        report.push_str("| Weekday | Transactions |\n");
        report.push_str("|---------|--------------|\n");
        for day in summary.weekday_activity() {
            report.push_str(&format!(
                "| {} | {} |\n",
                weekday_name(day.weekday),
                day.transactions
            ));
        }

        if !summary.category_breakdown().is_empty() {
            report.push_str("\n## Categories\n\n");
            report.push_str("| Category | Transactions | Sales | Average |\n");
            report.push_str("|----------|--------------|-------|---------|\n");
            for (category, stats) in summary.category_breakdown() {
                report.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    category,
                    stats.transactions,
                    self.money(stats.total),
                    self.money(stats.average)
                ));
            }
        }

        report.push_str("\n## Column Mapping\n\n");
        for m in &result.mapping.matches {
            report.push_str(&format!("- `{}` ← `{}`\n", m.field.key(), m.source));
        }

        report.push_str(
            "\n## Notes\n\
- Daily sales, payment methods and cleaned records are exported alongside this report.\n",
        );

        report
    }
}
