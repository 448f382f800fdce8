//! Group records into (zone, category) cells.
//!
//! Several rows of an extract can land on the same cell. The
//! [`DuplicatePolicy`] decides what the cell holds in that case.
//!
//! ```text
//! Records                         Cells (policy = mean)
//! ┌──────────────────────┐       ┌───────────────────────┐
//! │ 100, X, 1.0          │       │ (100, X) -> 2.0       │
//! │ 100, X, 3.0          │  →    │ (200, X) -> 5.0       │
//! │ 200, X, 5.0          │       └───────────────────────┘
//! └──────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{PivotError, PivotResult};
use crate::models::{Cell, Record};

/// How to resolve several records for the same (zone, category) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Mean of the finite values; `null` when there are none.
    #[default]
    Mean,
    /// The last record wins, even if its value is missing.
    Last,
    /// Any duplicate is an error.
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(DuplicatePolicy::Mean),
            "last" => Ok(DuplicatePolicy::Last),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(format!(
                "unknown duplicate policy '{}' (expected mean, last or reject)",
                other
            )),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DuplicatePolicy::Mean => "mean",
            DuplicatePolicy::Last => "last",
            DuplicatePolicy::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// Unrounded cell values keyed by (zone, category).
pub type CellMap = HashMap<(String, String), Cell>;

/// Group records into cells according to `policy`.
///
/// Values are not rounded here.
pub fn group_cells(records: &[Record], policy: DuplicatePolicy) -> PivotResult<CellMap> {
    let mut cells: HashMap<(String, String), CellAccumulator> = HashMap::new();

    for record in records {
        let key = (record.zone.clone(), record.category.clone());
        let acc = cells.entry(key).or_default();
        if policy == DuplicatePolicy::Reject && acc.seen > 0 {
            return Err(PivotError::DuplicateCell {
                zone: record.zone.clone(),
                category: record.category.clone(),
            });
        }
        acc.add(record.value);
    }

    Ok(cells
        .into_iter()
        .map(|(key, acc)| (key, acc.build(policy)))
        .collect())
}

/// Accumulates the values seen for one cell.
#[derive(Debug, Default)]
struct CellAccumulator {
    sum: f64,
    // running mean, used when `sum` overflows
    mean: f64,
    finite: usize,
    seen: usize,
    last: Option<f64>,
}

impl CellAccumulator {
    fn add(&mut self, value: Option<f64>) {
        self.seen += 1;
        let value = value.filter(|v| v.is_finite());
        if let Some(v) = value {
            self.sum += v;
            self.finite += 1;
            self.mean += (v - self.mean) / self.finite as f64;
        }
        self.last = value;
    }

    fn build(self, policy: DuplicatePolicy) -> Cell {
        match policy {
            DuplicatePolicy::Mean | DuplicatePolicy::Reject => {
                (self.finite > 0).then(|| {
                    if self.sum.is_finite() {
                        self.sum / self.finite as f64
                    } else {
                        self.mean
                    }
                })
            }
            DuplicatePolicy::Last => self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(zone: &str, category: &str) -> (String, String) {
        (zone.to_string(), category.to_string())
    }

    fn sample() -> Vec<Record> {
        vec![
            Record::new("100", "X", Some(1.0)),
            Record::new("100", "X", Some(3.0)),
            Record::new("100", "X", None),
            Record::new("200", "X", Some(5.0)),
        ]
    }

    #[test]
    fn test_mean_skips_missing() {
        let cells = group_cells(&sample(), DuplicatePolicy::Mean).unwrap();

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[&key("100", "X")], Some(2.0));
        assert_eq!(cells[&key("200", "X")], Some(5.0));
    }

    #[test]
    fn test_mean_all_missing_is_null() {
        let records = vec![Record::new("100", "X", None), Record::new("100", "X", None)];
        let cells = group_cells(&records, DuplicatePolicy::Mean).unwrap();

        assert_eq!(cells[&key("100", "X")], None);
    }

    #[test]
    fn test_mean_of_huge_values_stays_finite() {
        let records = vec![
            Record::new("100", "X", Some(f64::MAX)),
            Record::new("100", "X", Some(f64::MAX)),
        ];
        let cells = group_cells(&records, DuplicatePolicy::Mean).unwrap();

        assert_eq!(cells[&key("100", "X")], Some(f64::MAX));
    }

    #[test]
    fn test_last_wins() {
        let cells = group_cells(&sample(), DuplicatePolicy::Last).unwrap();

        // last row for (100, X) has no value
        assert_eq!(cells[&key("100", "X")], None);
        assert_eq!(cells[&key("200", "X")], Some(5.0));
    }

    #[test]
    fn test_reject_duplicates() {
        let err = group_cells(&sample(), DuplicatePolicy::Reject).unwrap_err();

        match err {
            PivotError::DuplicateCell { zone, category } => {
                assert_eq!(zone, "100");
                assert_eq!(category, "X");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reject_accepts_unique_cells() {
        let records = vec![Record::new("100", "X", Some(1.0)), Record::new("100", "Y", None)];
        let cells = group_cells(&records, DuplicatePolicy::Reject).unwrap();

        assert_eq!(cells[&key("100", "X")], Some(1.0));
        assert_eq!(cells[&key("100", "Y")], None);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Mean".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Mean));
        assert_eq!("last".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Last));
        assert_eq!(" reject ".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Reject));
        assert!("sum".parse::<DuplicatePolicy>().is_err());
        assert_eq!(DuplicatePolicy::Last.to_string(), "last");
    }
}
