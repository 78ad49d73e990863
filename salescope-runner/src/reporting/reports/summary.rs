//! Headline numbers shared by the Markdown report and console output.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::analysis::AnalysisResult;

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentShare {
    pub method: String,
    pub transactions: usize,
    pub share_pct: f64,
    pub total: Decimal,
}

#[derive(Debug, Clone)]
pub struct SummaryHighlights {
    pub records: usize,
    pub total_sales: Decimal,
    pub average_sale: Decimal,
    pub top_category: Option<String>,
    pub dropped_rows: usize,
    /// Busiest method first.
    pub payment_shares: Vec<PaymentShare>,
    /// The busiest days with their sales, at most `top_days` entries.
    pub top_days: Vec<(NaiveDate, Decimal)>,
}

impl SummaryHighlights {
    pub fn from_result(result: &AnalysisResult, top_days: usize) -> Self {
        let summary = &result.summary;

        let mut payment_shares: Vec<PaymentShare> = summary
            .payment_method_breakdown()
            .iter()
            .map(|(method, &transactions)| PaymentShare {
                method: method.clone(),
                transactions,
                share_pct: summary.payment_share_pct(method),
                total: summary
                    .payment_method_totals()
                    .get(method)
                    .copied()
                    .unwrap_or_default(),
            })
            .collect();
        payment_shares.sort_by(|a, b| {
            b.transactions
                .cmp(&a.transactions)
                .then_with(|| a.method.cmp(&b.method))
        });

        let top_days = summary
            .most_active_days()
            .iter()
            .take(top_days)
            .map(|date| {
                let sales = summary.sales_by_day().get(date).copied().unwrap_or_default();
                (*date, sales)
            })
            .collect();

        Self {
            records: summary.record_count(),
            total_sales: summary.total_sales(),
            average_sale: summary.average_sale(),
            top_category: summary.top_category().map(String::from),
            dropped_rows: result.clean.dropped,
            payment_shares,
            top_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_json;
    use crate::config::AnalysisConfig;
    use serde_json::json;

    #[test]
    fn highlights_from_result() {
        let input = json!([
            { "date": "2024-01-02", "amount": 5, "payment_method": "cash" },
            { "date": "2024-01-01", "amount": 10, "payment_method": "card", "category": "Books" },
            { "date": "2024-01-01", "amount": 20, "payment_method": "card", "category": "Toys" },
            { "date": "2024-01-03", "amount": 1, "payment_method": "upi" },
            { "date": "nope", "amount": 1, "payment_method": "upi" }
        ]);
        let result = analyze_json("inline", &input, &AnalysisConfig::default()).unwrap();
        let highlights = SummaryHighlights::from_result(&result, 2);

        assert_eq!(highlights.records, 4);
        assert_eq!(highlights.total_sales, Decimal::new(36, 0));
        assert_eq!(highlights.dropped_rows, 1);
        assert_eq!(highlights.top_category.as_deref(), Some("Toys"));

        assert_eq!(highlights.payment_shares[0].method, "card");
        assert_eq!(highlights.payment_shares[0].share_pct, 50.0);
        assert_eq!(highlights.payment_shares[0].total, Decimal::new(30, 0));
        assert_eq!(highlights.payment_shares[1].method, "cash");

        let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        assert_eq!(
            highlights.top_days,
            vec![(jan(1), Decimal::new(30, 0)), (jan(2), Decimal::new(5, 0))]
        );
    }
}
