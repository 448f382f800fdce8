//! Transformation module.
//!
//! - Grouper: records to (zone, category) cells, duplicate handling
//! - Pivot: full zone x category lookup table, rounding
//! - Pipeline: parse + pivot + validate for one extract

pub mod grouper;
pub mod pipeline;
pub mod pivot;

pub use grouper::{group_cells, DuplicatePolicy};
pub use pipeline::*;
pub use pivot::{category_set, pivot, pivot_with, round_to_cents, PivotOptions};
