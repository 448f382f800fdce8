//! Pivot records into a zone -> category -> value lookup.
//!
//! The pivot is a full outer join of zones and categories: the category set
//! is collected over the whole input first, then every zone row is built
//! against that full set, with `null` where a zone has no data.

use std::collections::{BTreeMap, BTreeSet};

use super::grouper::{group_cells, DuplicatePolicy};
use crate::error::{PivotError, PivotResult};
use crate::models::{PivotTable, Record, ZoneRow};

/// Options for [`pivot_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PivotOptions {
    /// Resolution for repeated (zone, category) pairs.
    pub duplicates: DuplicatePolicy,
}

/// Sorted distinct category labels across all records.
pub fn category_set(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Pivot with the default options (duplicates averaged).
pub fn pivot(records: &[Record]) -> PivotResult<PivotTable> {
    pivot_with(records, &PivotOptions::default())
}

/// Pivot records into a complete zone x category table.
///
/// Cells are rounded with [`round_to_cents`]; pairs without a finite value
/// are `None`.
pub fn pivot_with(records: &[Record], options: &PivotOptions) -> PivotResult<PivotTable> {
    validate_records(records)?;

    let categories = category_set(records);
    let mut cells = group_cells(records, options.duplicates)?;

    let zones: BTreeSet<&str> = records.iter().map(|r| r.zone.as_str()).collect();

    let mut table = BTreeMap::new();
    for zone in zones {
        let row: ZoneRow = categories
            .iter()
            .map(|category| {
                let cell = cells
                    .remove(&(zone.to_string(), category.clone()))
                    .flatten()
                    .map(round_to_cents);
                (category.clone(), cell)
            })
            .collect();
        table.insert(zone.to_string(), row);
    }

    Ok(table)
}

/// Round to 2 decimals, ties to even on the scaled value.
///
/// Values too large to scale are returned as-is; they have no fractional part.
pub fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round_ties_even() / 100.0;
    // avoid emitting -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn validate_records(records: &[Record]) -> PivotResult<()> {
    for (index, record) in records.iter().enumerate() {
        if record.zone.trim().is_empty() {
            return Err(PivotError::MissingZone { index });
        }
        if record.category.trim().is_empty() {
            return Err(PivotError::MissingCategory {
                index,
                zone: record.zone.clone(),
            });
        }
    }
    Ok(())
}
