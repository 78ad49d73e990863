//! Cell coercion: raw values → calendar dates, decimal amounts, labels.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{CleaningOptions, DropReason};
use crate::domain::RawValue;

/// Interpret a cell as a calendar date. Datetimes are truncated to their date.
pub fn parse_date(value: Option<&RawValue>, options: &CleaningOptions) -> Result<NaiveDate, DropReason> {
    let value = match value {
        Some(v) if !v.is_blank() => v,
        _ => return Err(DropReason::MissingDate),
    };

    match value {
        RawValue::Date(d) => Ok(*d),
        RawValue::DateTime(dt) => Ok(dt.date()),
        RawValue::Text(s) => parse_date_text(s.trim(), &options.date_formats)
            .ok_or_else(|| DropReason::InvalidDate(s.clone())),
        other => Err(DropReason::InvalidDate(other.to_string())),
    }
}

fn parse_date_text(s: &str, formats: &[String]) -> Option<NaiveDate> {
    for fmt in formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Largest accepted amount: 10^15. Sums of any row count that fits in
/// memory stay far below `Decimal::MAX` (~7.9 × 10^28).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Interpret a cell as a non-negative decimal amount no larger than `MAX_AMOUNT`.
pub fn parse_amount(value: Option<&RawValue>, options: &CleaningOptions) -> Result<Decimal, DropReason> {
    let value = match value {
        Some(v) if !v.is_blank() => v,
        _ => return Err(DropReason::MissingAmount),
    };

    let amount = match value {
        RawValue::Int(i) => Decimal::from(*i),
        RawValue::Float(f) => {
            if !f.is_finite() {
                return Err(DropReason::InvalidAmount(f.to_string()));
            }
            Decimal::try_from(*f).map_err(|_| DropReason::InvalidAmount(f.to_string()))?
        }
        RawValue::Text(s) => {
            parse_amount_text(s, options).ok_or_else(|| DropReason::InvalidAmount(s.clone()))?
        }
        other => return Err(DropReason::InvalidAmount(other.to_string())),
    };

    if amount < Decimal::ZERO {
        return Err(DropReason::NegativeAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(DropReason::AmountOutOfRange(amount));
    }
    Ok(amount)
}

fn parse_amount_text(s: &str, options: &CleaningOptions) -> Option<Decimal> {
    let mut text = s.trim().to_string();
    for symbol in &options.currency_symbols {
        text = text.replace(symbol.as_str(), "");
    }
    if let Some(sep) = options.thousands_separator {
        text = text.replace(sep, "");
    }
    let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Free-text label: trimmed text or a number rendered as text. Blank → `None`.
pub fn parse_label(value: Option<&RawValue>) -> Option<String> {
    match value {
        None => None,
        Some(v) if v.is_blank() => None,
        Some(RawValue::Text(s)) => Some(s.trim().to_string()),
        Some(other) => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> CleaningOptions {
        CleaningOptions::default()
    }

    fn text(s: &str) -> RawValue {
        RawValue::from(s)
    }

    #[test]
    fn parses_iso_and_alternate_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        for s in ["2024-01-15", "2024/01/15", "15.01.2024", "2024-01-15 13:45:00", "2024-01-15T13:45:00"] {
            assert_eq!(parse_date(Some(&text(s)), &opts()), Ok(expected), "format {s}");
        }
    }

    #[test]
    fn parses_rfc3339_dates() {
        let d = parse_date(Some(&text("2024-03-01T08:00:00+02:00")), &opts()).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn rejects_bad_and_missing_dates() {
        assert_eq!(parse_date(None, &opts()), Err(DropReason::MissingDate));
        assert_eq!(parse_date(Some(&RawValue::Null), &opts()), Err(DropReason::MissingDate));
        assert!(matches!(
            parse_date(Some(&text("2024-02-30")), &opts()),
            Err(DropReason::InvalidDate(_))
        ));
        assert!(matches!(
            parse_date(Some(&RawValue::Int(45000)), &opts()),
            Err(DropReason::InvalidDate(_))
        ));
    }

    #[test]
    fn parses_amounts_of_every_numeric_shape() {
        assert_eq!(parse_amount(Some(&RawValue::Int(10)), &opts()), Ok(Decimal::new(10, 0)));
        assert_eq!(parse_amount(Some(&RawValue::Float(2.5)), &opts()), Ok(Decimal::new(25, 1)));
        assert_eq!(parse_amount(Some(&text(" 19.99 ")), &opts()), Ok(Decimal::new(1999, 2)));
        assert_eq!(parse_amount(Some(&text("1e2")), &opts()), Ok(Decimal::new(100, 0)));
    }

    #[test]
    fn rejects_bad_negative_and_non_finite_amounts() {
        assert!(matches!(parse_amount(Some(&text("bad")), &opts()), Err(DropReason::InvalidAmount(_))));
        assert!(matches!(parse_amount(Some(&text("-5")), &opts()), Err(DropReason::NegativeAmount(_))));
        assert!(matches!(
            parse_amount(Some(&RawValue::Float(f64::NAN)), &opts()),
            Err(DropReason::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount(Some(&RawValue::Bool(true)), &opts()),
            Err(DropReason::InvalidAmount(_))
        ));
        assert_eq!(parse_amount(Some(&text("")), &opts()), Err(DropReason::MissingAmount));
    }

    #[test]
    fn amounts_above_ceiling_are_out_of_range() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_000i64));
        assert_eq!(
            parse_amount(Some(&text("1000000000000000")), &opts()),
            Ok(MAX_AMOUNT)
        );
        assert!(matches!(
            parse_amount(Some(&text("79228162514264337593543950335")), &opts()),
            Err(DropReason::AmountOutOfRange(_))
        ));
        assert!(matches!(
            parse_amount(Some(&RawValue::Float(1e20)), &opts()),
            Err(DropReason::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn currency_symbols_only_stripped_when_configured() {
        assert!(parse_amount(Some(&text("₹1,250.50")), &opts()).is_err());

        let configured = CleaningOptions {
            currency_symbols: vec!["₹".into(), "$".into()],
            thousands_separator: Some(','),
            ..CleaningOptions::default()
        };
        assert_eq!(
            parse_amount(Some(&text("₹1,250.50")), &configured),
            Ok(Decimal::new(125050, 2))
        );
        assert_eq!(parse_amount(Some(&text("$ 3")), &configured), Ok(Decimal::new(3, 0)));
    }

    #[test]
    fn labels_are_trimmed_and_blank_is_none() {
        assert_eq!(parse_label(Some(&text("  Card "))), Some("Card".into()));
        assert_eq!(parse_label(Some(&RawValue::Int(7))), Some("7".into()));
        assert_eq!(parse_label(Some(&text("  "))), None);
        assert_eq!(parse_label(None), None);
    }
}
