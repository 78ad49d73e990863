//! Row validation.

use std::collections::BTreeMap;

use super::parse::{parse_amount, parse_date, parse_label};
use super::{fields, CleaningOptions, DropReason, DroppedRow};
use crate::domain::{RawRow, SaleRecord};

/// Result of cleaning: surviving records in input order plus every drop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanOutcome {
    pub records: Vec<SaleRecord>,
    pub drops: Vec<DroppedRow>,
}

impl CleanOutcome {
    pub fn dropped(&self) -> usize {
        self.drops.len()
    }

    pub fn kept(&self) -> usize {
        self.records.len()
    }

    /// Drop counts grouped by `DropReason::kind`.
    pub fn drop_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for drop in &self.drops {
            *counts.entry(drop.reason.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// `(records, dropped_count)`.
    pub fn into_parts(self) -> (Vec<SaleRecord>, usize) {
        let dropped = self.drops.len();
        (self.records, dropped)
    }
}

pub(crate) fn clean_rows(rows: &[RawRow], options: &CleaningOptions) -> CleanOutcome {
    let mut outcome = CleanOutcome {
        records: Vec::with_capacity(rows.len()),
        drops: Vec::new(),
    };

    for (index, row) in rows.iter().enumerate() {
        match clean_row(row, options) {
            Ok(record) => outcome.records.push(record),
            Err(reason) => {
                tracing::debug!(row = index, %reason, "dropping row");
                outcome.drops.push(DroppedRow { index, reason });
            }
        }
    }

    tracing::info!(
        input = rows.len(),
        kept = outcome.kept(),
        dropped = outcome.dropped(),
        "cleaned rows"
    );
    outcome
}

fn clean_row(row: &RawRow, options: &CleaningOptions) -> Result<SaleRecord, DropReason> {
    let date = parse_date(row.get(fields::DATE), options)?;
    let amount = parse_amount(row.get(fields::AMOUNT), options)?;
    let payment_method = parse_label(row.get(fields::PAYMENT_METHOD))
        .unwrap_or_else(|| options.unknown_payment_label.clone());
    let category = parse_label(row.get(fields::CATEGORY));

    Ok(SaleRecord {
        date,
        amount,
        payment_method,
        category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawValue;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn row(pairs: &[(&str, RawValue)]) -> RawRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn keeps_valid_rows_in_input_order() {
        let rows = vec![
            row(&[("date", "2024-01-02".into()), ("amount", 5i64.into()), ("payment_method", "cash".into())]),
            row(&[("date", "2024-01-01".into()), ("amount", "7.25".into()), ("payment_method", "card".into())]),
        ];
        let outcome = clean_rows(&rows, &CleaningOptions::default());

        assert_eq!(outcome.kept(), 2);
        assert_eq!(outcome.records[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(outcome.records[1].amount, Decimal::new(725, 2));
    }

    #[test]
    fn records_index_and_reason_of_each_drop() {
        let rows = vec![
            row(&[("date", "2024-01-01".into()), ("amount", "-1".into())]),
            row(&[("amount", 3i64.into())]),
            row(&[("date", "2024-01-01".into()), ("amount", 3i64.into())]),
        ];
        let outcome = clean_rows(&rows, &CleaningOptions::default());

        assert_eq!(outcome.kept(), 1);
        assert_eq!(outcome.drops[0].index, 0);
        assert!(matches!(outcome.drops[0].reason, DropReason::NegativeAmount(_)));
        assert_eq!(outcome.drops[1], DroppedRow { index: 1, reason: DropReason::MissingDate });

        let counts = outcome.drop_counts();
        assert_eq!(counts["negative_amount"], 1);
        assert_eq!(counts["missing_date"], 1);
    }

    #[test]
    fn missing_payment_method_uses_configured_label() {
        let rows = vec![row(&[("date", "2024-01-01".into()), ("amount", 3i64.into()), ("payment_method", " ".into())])];
        let opts = CleaningOptions {
            unknown_payment_label: "n/a".into(),
            ..CleaningOptions::default()
        };
        let outcome = clean_rows(&rows, &opts);
        assert_eq!(outcome.records[0].payment_method, "n/a");
        assert_eq!(outcome.records[0].category, None);
    }

    #[test]
    fn category_is_carried_when_present() {
        let rows = vec![row(&[
            ("date", "2024-01-01".into()),
            ("amount", 3i64.into()),
            ("payment_method", "card".into()),
            ("category", " Books ".into()),
        ])];
        let outcome = clean_rows(&rows, &CleaningOptions::default());
        assert_eq!(outcome.records[0].category.as_deref(), Some("Books"));
    }

    #[test]
    fn into_parts_returns_dropped_count() {
        let rows = vec![row(&[("date", "x".into()), ("amount", 1i64.into())])];
        let (records, dropped) = clean_rows(&rows, &CleaningOptions::default()).into_parts();
        assert!(records.is_empty());
        assert_eq!(dropped, 1);
    }
}
