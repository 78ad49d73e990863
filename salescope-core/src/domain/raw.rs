//! Raw rows: unvalidated cells exactly as a parser produced them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// A single untyped cell. Parsers keep whatever type the source format
/// carries; the pipeline decides what is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl RawValue {
    /// Null, or text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Convert a JSON scalar into a cell. Nested arrays/objects are kept as
    /// their JSON text so they fail validation instead of vanishing.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => RawValue::Null,
            JsonValue::Bool(b) => RawValue::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    RawValue::Float(f)
                } else {
                    RawValue::Text(n.to_string())
                }
            }
            JsonValue::String(s) => RawValue::Text(s.clone()),
            other => RawValue::Text(other.to_string()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, ""),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(i) => write!(f, "{i}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Date(d) => write!(f, "{d}"),
            RawValue::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(d: NaiveDate) -> Self {
        RawValue::Date(d)
    }
}

/// Column name → cell. `BTreeMap` keeps column order deterministic.
pub type RawRow = BTreeMap<String, RawValue>;

/// A parsed table: header order as found in the source, plus rows keyed by header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> &[RawRow] {
        &self.rows[..n.min(self.rows.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_detection() {
        assert!(RawValue::Null.is_blank());
        assert!(RawValue::from("   ").is_blank());
        assert!(!RawValue::from("card").is_blank());
        assert!(!RawValue::Int(0).is_blank());
    }

    #[test]
    fn json_numbers_keep_integer_type() {
        assert_eq!(RawValue::from_json(&json!(10)), RawValue::Int(10));
        assert_eq!(RawValue::from_json(&json!(10.5)), RawValue::Float(10.5));
        assert_eq!(RawValue::from_json(&json!("bad")), RawValue::from("bad"));
        assert_eq!(RawValue::from_json(&json!(null)), RawValue::Null);
    }

    #[test]
    fn json_containers_become_text() {
        assert_eq!(
            RawValue::from_json(&json!([1, 2])),
            RawValue::Text("[1,2]".into())
        );
    }

    #[test]
    fn head_clamps_to_length() {
        let mut row = RawRow::new();
        row.insert("amount".into(), RawValue::Int(1));
        let table = RawTable::new(vec!["amount".into()], vec![row.clone(), row]);
        assert_eq!(table.head(10).len(), 2);
        assert_eq!(table.head(1).len(), 1);
        assert_eq!(table.head(0).len(), 0);
    }
}
