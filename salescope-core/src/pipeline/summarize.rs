//! Aggregation of cleaned records into a `Summary`.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::domain::{CategoryStats, SaleRecord, Summary, WeekdayActivity};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub(crate) fn summarize_records(records: &[SaleRecord]) -> Summary {
    let mut total_sales = Decimal::ZERO;
    let mut sales_by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    let mut day_counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut payment_method_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    let mut payment_method_totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut weekday_counts = [0usize; 7];
    let mut categories: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();

    for record in records {
        total_sales += record.amount;
        *sales_by_day.entry(record.date).or_insert(Decimal::ZERO) += record.amount;
        *day_counts.entry(record.date).or_insert(0) += 1;
        *payment_method_breakdown
            .entry(record.payment_method.clone())
            .or_insert(0) += 1;
        *payment_method_totals
            .entry(record.payment_method.clone())
            .or_insert(Decimal::ZERO) += record.amount;
        weekday_counts[record.date.weekday().num_days_from_monday() as usize] += 1;

        if let Some(category) = &record.category {
            let entry = categories
                .entry(category.clone())
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += record.amount;
        }
    }

    let record_count = records.len();
    let average_sale = mean(total_sales, record_count);

    let category_breakdown: BTreeMap<String, CategoryStats> = categories
        .into_iter()
        .map(|(name, (transactions, total))| {
            let stats = CategoryStats {
                transactions,
                total,
                average: mean(total, transactions),
            };
            (name, stats)
        })
        .collect();

    Summary {
        record_count,
        total_sales,
        average_sale,
        sales_by_day,
        payment_method_breakdown,
        payment_method_totals,
        most_active_days: rank_days(&day_counts),
        weekday_activity: WEEK
            .iter()
            .zip(weekday_counts)
            .map(|(&weekday, transactions)| WeekdayActivity {
                weekday,
                transactions,
            })
            .collect(),
        top_category: top_category(&category_breakdown),
        category_breakdown,
    }
}

fn mean(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count as u64)
    }
}

/// Dates by descending transaction count; equal counts keep ascending date order.
fn rank_days(day_counts: &BTreeMap<NaiveDate, usize>) -> Vec<NaiveDate> {
    let mut days: Vec<(NaiveDate, usize)> = day_counts.iter().map(|(d, c)| (*d, *c)).collect();
    days.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    days.into_iter().map(|(d, _)| d).collect()
}

/// Largest total wins; ties go to the lexicographically first name.
fn top_category(categories: &BTreeMap<String, CategoryStats>) -> Option<String> {
    categories
        .iter()
        .fold(None::<(&String, Decimal)>, |best, (name, stats)| match best {
            Some((_, best_total)) if stats.total <= best_total => best,
            _ => Some((name, stats.total)),
        })
        .map(|(name, _)| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sale(d: u32, amount: i64, method: &str) -> SaleRecord {
        SaleRecord::new(date(d), Decimal::new(amount, 0), method)
    }

    #[test]
    fn empty_input_gives_zero_summary() {
        let summary = summarize_records(&[]);
        assert_eq!(summary.total_sales(), Decimal::ZERO);
        assert_eq!(summary.average_sale(), Decimal::ZERO);
        assert!(summary.sales_by_day().is_empty());
        assert!(summary.payment_method_breakdown().is_empty());
        assert!(summary.most_active_days().is_empty());
        assert_eq!(summary.top_category(), None);
        assert_eq!(summary.weekday_activity().len(), 7);
        assert!(summary.weekday_activity().iter().all(|w| w.transactions == 0));
    }

    #[test]
    fn breakdown_counts_and_totals_per_method() {
        let records = vec![sale(1, 10, "card"), sale(1, 20, "card"), sale(2, 5, "cash")];
        let summary = summarize_records(&records);

        assert_eq!(summary.payment_method_breakdown()["card"], 2);
        assert_eq!(summary.payment_method_breakdown()["cash"], 1);
        assert_eq!(summary.payment_method_totals()["card"], Decimal::new(30, 0));
        assert_eq!(summary.payment_method_totals()["cash"], Decimal::new(5, 0));
    }

    #[test]
    fn most_active_days_breaks_ties_by_earlier_date() {
        let records = vec![
            sale(3, 1, "card"),
            sale(5, 1, "card"),
            sale(5, 1, "card"),
            sale(2, 1, "cash"),
            sale(4, 1, "cash"),
            sale(4, 1, "cash"),
        ];
        let summary = summarize_records(&records);
        assert_eq!(summary.most_active_days(), &[date(4), date(5), date(2), date(3)]);
    }

    #[test]
    fn weekday_activity_starts_on_monday() {
        // 2024-01-01 was a Monday, 2024-01-07 a Sunday.
        let records = vec![sale(1, 1, "card"), sale(7, 1, "card"), sale(7, 1, "card")];
        let summary = summarize_records(&records);
        let week = summary.weekday_activity();
        assert_eq!(week[0].weekday, Weekday::Mon);
        assert_eq!(week[0].transactions, 1);
        assert_eq!(week[6].weekday, Weekday::Sun);
        assert_eq!(week[6].transactions, 2);
    }

    #[test]
    fn category_stats_and_top_category() {
        let records = vec![
            sale(1, 10, "card").with_category("Books"),
            sale(1, 30, "card").with_category("Books"),
            sale(2, 40, "cash").with_category("Toys"),
            sale(2, 99, "cash"),
        ];
        let summary = summarize_records(&records);

        let books = &summary.category_breakdown()["Books"];
        assert_eq!(books.transactions, 2);
        assert_eq!(books.total, Decimal::new(40, 0));
        assert_eq!(books.average, Decimal::new(20, 0));
        // Books and Toys tie at 40; the earlier name wins.
        assert_eq!(summary.top_category(), Some("Books"));
        assert_eq!(summary.category_breakdown().len(), 2);
    }
}
