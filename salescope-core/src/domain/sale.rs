//! SaleRecord: one validated transaction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cleaned sale. Only `SalesDataPipeline::clean` produces these from raw
/// input, so `date` is always a real calendar date and `amount` is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SaleRecord {
    pub fn new(date: NaiveDate, amount: Decimal, payment_method: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            payment_method: payment_method.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}
