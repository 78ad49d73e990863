//! Summary: the aggregate result of one pipeline run.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transactions on one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayActivity {
    pub weekday: Weekday,
    pub transactions: usize,
}

/// Per-category aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub transactions: usize,
    pub total: Decimal,
    pub average: Decimal,
}

/// Immutable aggregate over a set of sale records.
///
/// Built only by `SalesDataPipeline::summarize`, which recomputes every field
/// from scratch. Fields are read through accessors so the cross-field
/// invariants (day totals sum to `total_sales`, breakdown counts sum to
/// `record_count`) cannot be broken after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub(crate) record_count: usize,
    pub(crate) total_sales: Decimal,
    pub(crate) average_sale: Decimal,
    pub(crate) sales_by_day: BTreeMap<NaiveDate, Decimal>,
    pub(crate) payment_method_breakdown: BTreeMap<String, usize>,
    pub(crate) payment_method_totals: BTreeMap<String, Decimal>,
    pub(crate) most_active_days: Vec<NaiveDate>,
    pub(crate) weekday_activity: Vec<WeekdayActivity>,
    pub(crate) category_breakdown: BTreeMap<String, CategoryStats>,
    pub(crate) top_category: Option<String>,
}

impl Summary {
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn total_sales(&self) -> Decimal {
        self.total_sales
    }

    /// `total_sales / record_count`, or zero for an empty dataset.
    pub fn average_sale(&self) -> Decimal {
        self.average_sale
    }

    pub fn sales_by_day(&self) -> &BTreeMap<NaiveDate, Decimal> {
        &self.sales_by_day
    }

    /// Transaction count per payment method.
    pub fn payment_method_breakdown(&self) -> &BTreeMap<String, usize> {
        &self.payment_method_breakdown
    }

    /// Summed amount per payment method.
    pub fn payment_method_totals(&self) -> &BTreeMap<String, Decimal> {
        &self.payment_method_totals
    }

    /// Every date with at least one sale, busiest first; ties go to the earlier date.
    pub fn most_active_days(&self) -> &[NaiveDate] {
        &self.most_active_days
    }

    /// Monday through Sunday, zero-filled.
    pub fn weekday_activity(&self) -> &[WeekdayActivity] {
        &self.weekday_activity
    }

    pub fn category_breakdown(&self) -> &BTreeMap<String, CategoryStats> {
        &self.category_breakdown
    }

    /// Category with the largest total.
    pub fn top_category(&self) -> Option<&str> {
        self.top_category.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Percentage of transactions paid with `method`, 0.0 for an empty summary.
    pub fn payment_share_pct(&self, method: &str) -> f64 {
        if self.record_count == 0 {
            return 0.0;
        }
        let count = self
            .payment_method_breakdown
            .get(method)
            .copied()
            .unwrap_or(0);
        count as f64 / self.record_count as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Summary {
        let mut breakdown = BTreeMap::new();
        breakdown.insert("card".to_string(), 3);
        breakdown.insert("cash".to_string(), 1);
        Summary {
            record_count: 4,
            total_sales: Decimal::new(40, 0),
            average_sale: Decimal::new(10, 0),
            sales_by_day: BTreeMap::new(),
            payment_method_breakdown: breakdown,
            payment_method_totals: BTreeMap::new(),
            most_active_days: Vec::new(),
            weekday_activity: Vec::new(),
            category_breakdown: BTreeMap::new(),
            top_category: None,
        }
    }

    #[test]
    fn payment_share_uses_counts() {
        let summary = sample();
        assert!((summary.payment_share_pct("card") - 75.0).abs() < 1e-9);
        assert!((summary.payment_share_pct("cash") - 25.0).abs() < 1e-9);
        assert_eq!(summary.payment_share_pct("wire"), 0.0);
    }

    #[test]
    fn decimals_serialize_as_strings() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["total_sales"], "40");
        assert_eq!(json["payment_method_breakdown"]["card"], 3);
    }
}
