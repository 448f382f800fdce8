//! Domain models for the zip3 data pipeline.
//!
//! - [`Record`] - one measurement row (zone, category, value)
//! - [`Cell`] - a rounded value or `null`
//! - [`PivotTable`] - zone -> category -> cell lookup
//! - [`PeriodCode`] - `YYYYQn` label derived from an input file name

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

// =============================================================================
// Records
// =============================================================================

/// A single measurement row from a CSV extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Postal-zone prefix, already normalized (see [`normalize_zone`]).
    pub zone: String,
    /// Substance label.
    pub category: String,
    /// Measured value, `None` when the source field was empty or not finite.
    pub value: Option<f64>,
}

impl Record {
    pub fn new(zone: impl Into<String>, category: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            zone: zone.into(),
            category: category.into(),
            value,
        }
    }
}

/// Normalize a raw zone field the way a numeric column is stringified:
/// integers lose leading zeros and sign, anything else is kept as trimmed text.
///
/// Returns `None` for an empty field.
pub fn normalize_zone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<i64>() {
        Ok(n) => Some(n.to_string()),
        Err(_) => Some(trimmed.to_string()),
    }
}

// =============================================================================
// Pivot Output
// =============================================================================

/// Output cell: rounded value, or `null` when no value exists.
pub type Cell = Option<f64>;

/// One zone's row: every known category mapped to a cell.
pub type ZoneRow = BTreeMap<String, Cell>;

/// Full pivot: zone -> category -> cell, both levels sorted by key.
pub type PivotTable = BTreeMap<String, ZoneRow>;

// =============================================================================
// Period Codes
// =============================================================================

static PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}Q[1-4]$").expect("valid period regex"));

/// Year-quarter label such as `2020Q3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodCode(String);

impl PeriodCode {
    /// Parse a period label, returning `None` if it is not `YYYYQ[1-4]`.
    pub fn parse(label: &str) -> Option<Self> {
        PERIOD_RE
            .is_match(label)
            .then(|| PeriodCode(label.to_string()))
    }

    /// Derive the period from a file's stem (`data/2020Q3.csv` -> `2020Q3`).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_stem()
            .and_then(|s| s.to_str())
            .and_then(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Year part of the code.
    pub fn year(&self) -> u16 {
        self.0[..4].parse().unwrap_or_default()
    }

    /// Quarter number, 1 to 4.
    pub fn quarter(&self) -> u8 {
        self.0[5..].parse().unwrap_or_default()
    }

    /// Artifact file name for this period (`2020Q3.json`).
    pub fn artifact_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for PeriodCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
