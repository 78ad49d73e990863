//! Column resolution: map whatever headers a spreadsheet has onto the
//! canonical fields the pipeline reads.
//!
//! Resolution runs in three passes over all fields:
//! 1. explicit overrides from configuration claim their headers first
//! 2. exact matches against each field's aliases (after normalization)
//! 3. closest alias by similarity ratio, if it clears the cutoff, handed
//!    out best score first
//!
//! A header is assigned to at most one field.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ingest::IngestError;
use crate::domain::{RawRow, RawTable};
use crate::pipeline::fields;

/// Default minimum similarity for a fuzzy header match.
pub const DEFAULT_CUTOFF: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Date,
    Amount,
    PaymentMethod,
    Category,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 4] = [
        CanonicalField::Date,
        CanonicalField::Amount,
        CanonicalField::PaymentMethod,
        CanonicalField::Category,
    ];

    /// Key written into canonical raw rows.
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::Date => fields::DATE,
            CanonicalField::Amount => fields::AMOUNT,
            CanonicalField::PaymentMethod => fields::PAYMENT_METHOD,
            CanonicalField::Category => fields::CATEGORY,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, CanonicalField::Date | CanonicalField::Amount)
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Date => &[
                "date",
                "order_date",
                "transaction_date",
                "sale_date",
                "invoice_date",
                "day",
            ],
            CanonicalField::Amount => &[
                "amount",
                "sales",
                "sale_amount",
                "total",
                "revenue",
                "price",
                "value",
            ],
            CanonicalField::PaymentMethod => &[
                "payment_method",
                "payment",
                "payment_type",
                "payment_mode",
                "method",
                "tender",
            ],
            CanonicalField::Category => &["category", "product_category", "department"],
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Explicit header names, one per field. Unset fields are auto-detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnOverrides {
    pub date: Option<String>,
    pub amount: Option<String>,
    pub payment_method: Option<String>,
    pub category: Option<String>,
}

impl ColumnOverrides {
    fn get(&self, field: CanonicalField) -> Option<&str> {
        match field {
            CanonicalField::Date => self.date.as_deref(),
            CanonicalField::Amount => self.amount.as_deref(),
            CanonicalField::PaymentMethod => self.payment_method.as_deref(),
            CanonicalField::Category => self.category.as_deref(),
        }
    }
}

/// How a header was matched to its field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    Configured,
    Exact,
    Fuzzy { score: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMatch {
    pub field: CanonicalField,
    pub source: String,
    pub kind: MatchKind,
}

/// Resolved header assignment for one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub matches: Vec<ColumnMatch>,
}

impl ColumnMapping {
    pub fn source_for(&self, field: CanonicalField) -> Option<&str> {
        self.matches
            .iter()
            .find(|m| m.field == field)
            .map(|m| m.source.as_str())
    }

    /// Rewrite every row to canonical keys. Unmapped columns are left behind.
    pub fn apply(&self, table: &RawTable) -> Vec<RawRow> {
        table
            .rows
            .iter()
            .map(|row| {
                self.matches
                    .iter()
                    .filter_map(|m| {
                        row.get(&m.source)
                            .map(|value| (m.field.key().to_string(), value.clone()))
                    })
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ColumnResolver {
    overrides: ColumnOverrides,
    cutoff: f64,
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new(ColumnOverrides::default(), DEFAULT_CUTOFF)
    }
}

impl ColumnResolver {
    pub fn new(overrides: ColumnOverrides, cutoff: f64) -> Self {
        Self { overrides, cutoff }
    }

    pub fn resolve(&self, headers: &[String]) -> Result<ColumnMapping, IngestError> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize(h)).collect();
        let mut assigned: Vec<Option<CanonicalField>> = vec![None; headers.len()];
        let mut found: Vec<(CanonicalField, usize, MatchKind)> = Vec::new();

        for field in CanonicalField::ALL {
            let Some(name) = self.overrides.get(field) else {
                continue;
            };
            let wanted = normalize(name);
            let idx = normalized
                .iter()
                .position(|h| *h == wanted)
                .ok_or_else(|| {
                    IngestError::MissingColumn(format!("'{name}' (configured for {field})"))
                })?;
            if let Some(first) = assigned[idx] {
                return Err(IngestError::ColumnConflict {
                    header: headers[idx].clone(),
                    first: first.to_string(),
                    second: field.to_string(),
                });
            }
            assigned[idx] = Some(field);
            found.push((field, idx, MatchKind::Configured));
        }

        // Exact aliases for every field are settled before any fuzzy pass.
        for field in CanonicalField::ALL {
            if found.iter().any(|(f, _, _)| *f == field) {
                continue;
            }
            let exact = normalized
                .iter()
                .enumerate()
                .find(|(i, h)| assigned[*i].is_none() && field.aliases().contains(&h.as_str()));
            if let Some((idx, _)) = exact {
                assigned[idx] = Some(field);
                found.push((field, idx, MatchKind::Exact));
            }
        }

        for (field, idx, score) in self.fuzzy_candidates(&normalized, &assigned, &found) {
            if assigned[idx].is_some() || found.iter().any(|(f, _, _)| *f == field) {
                continue;
            }
            assigned[idx] = Some(field);
            found.push((field, idx, MatchKind::Fuzzy { score }));
        }

        let mut mapping = ColumnMapping::default();
        for field in CanonicalField::ALL {
            match found.iter().position(|(f, _, _)| *f == field) {
                Some(pos) => {
                    let (_, idx, kind) = found.swap_remove(pos);
                    tracing::debug!(%field, source = %headers[idx], ?kind, "column resolved");
                    mapping.matches.push(ColumnMatch {
                        field,
                        source: headers[idx].clone(),
                        kind,
                    });
                }
                None if field.is_required() => {
                    return Err(IngestError::MissingColumn(field.to_string()));
                }
                None => tracing::debug!(%field, "optional column not found"),
            }
        }

        Ok(mapping)
    }

    /// Every `(field, header, score)` pair above the cutoff among unresolved
    /// fields and free headers, best score first. Ties keep field order, then
    /// header order.
    fn fuzzy_candidates(
        &self,
        normalized: &[String],
        assigned: &[Option<CanonicalField>],
        found: &[(CanonicalField, usize, MatchKind)],
    ) -> Vec<(CanonicalField, usize, f64)> {
        let mut candidates = Vec::new();
        for field in CanonicalField::ALL {
            if found.iter().any(|(f, _, _)| *f == field) {
                continue;
            }
            for (idx, header) in normalized.iter().enumerate() {
                if assigned[idx].is_some() {
                    continue;
                }
                let score = field
                    .aliases()
                    .iter()
                    .map(|alias| similarity(header, alias))
                    .fold(0.0_f64, f64::max);
                if score >= self.cutoff {
                    candidates.push((field, idx, score));
                }
            }
        }
        // Stable sort keeps the field-then-header insertion order on ties.
        candidates.sort_by(|a, b| b.2.total_cmp(&a.2));
        candidates
    }
}

/// Lowercase, trim, and collapse spaces/dashes/dots to underscores.
fn normalize(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '.' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Ratcliff/Obershelp similarity in `[0, 1]`: twice the number of matching
/// characters over the combined length.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, k) = longest_common_block(a, b);
    if k == 0 {
        return 0;
    }
    k + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + k..], &b[j + k..])
}

/// Longest common substring as `(start_in_a, start_in_b, len)`; earliest wins ties.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let k = curr[j + 1];
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}
