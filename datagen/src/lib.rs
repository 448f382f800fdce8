//! # zip3-datagen - quarterly substance extracts to JSON lookups
//!
//! Converts CSV extracts of substance concentrations, keyed by 3-digit postal
//! zone prefix, into the nested JSON files a choropleth front-end loads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ 2019Q1.csv  │────▶│   Parser    │────▶│    Pivot    │────▶│ 2019Q1.json │
//! │  (any enc)  │     │  (records)  │     │ zone x subst│     │  (+ lists)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zip3_datagen::{run_quarters, QuartersConfig};
//!
//! let report = run_quarters(&QuartersConfig::default())?;
//! println!("Converted {} quarters", report.periods.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Records, pivot table, period codes
//! - [`parser`] - CSV reading with encoding detection
//! - [`transform`] - Grouping, pivot, pipeline
//! - [`validation`] - Artifact schema validation
//! - [`output`] - Atomic JSON writer
//! - [`driver`] - Single-file and quarters modes
//! - [`config`] - Defaults and environment settings
//! - [`logs`] - Progress log

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Output
pub mod output;

// Orchestration
pub mod config;
pub mod driver;
pub mod logs;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{
    CsvError, DriverError, DriverResult, OutputError, PivotError, ValidationError,
};

pub use models::{normalize_zone, Cell, PeriodCode, PivotTable, Record, ZoneRow};

pub use parser::{parse_bytes, parse_csv_file, ColumnMapping, ParseResult};

pub use transform::{
    category_set, group_cells, pivot, pivot_bytes, pivot_csv, pivot_records, pivot_with,
    round_to_cents, CsvInfo, DuplicatePolicy, PipelineOptions, PipelineResult, PivotOptions,
};

pub use output::{write_json, JsonStyle, SpacedFormatter};

pub use config::{QuartersConfig, Settings, SingleFileConfig};

pub use driver::{
    discover_period_files, run_quarters, run_single, PeriodFile, QuartersReport,
    SingleFileReport,
};
