//! High-level pipeline API for CSV extract to lookup table conversion.
//!
//! Combines parsing, pivoting and validation for one extract.
//!
//! # Example
//!
//! ```rust,ignore
//! use zip3_datagen::transform::pipeline::{pivot_csv, PipelineOptions};
//! use std::path::Path;
//!
//! let result = pivot_csv(Path::new("2019Q1.csv"), &PipelineOptions::default())?;
//! println!("{} zones, {} substances", result.table.len(), result.categories.len());
//! ```

use std::path::Path;

use super::pivot::{category_set, pivot_with, PivotOptions};
use crate::error::DriverResult;
use crate::logs::{log_info_indent, log_warning};
use crate::models::{PivotTable, Record};
use crate::parser::{parse_bytes, parse_csv_file, ColumnMapping, ParseResult};
use crate::validation::check_pivot_table;

/// Options for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Header names of the zone, category and value columns
    pub columns: ColumnMapping,

    /// Pivot behavior
    pub pivot: PivotOptions,

    /// Skip the schema check of the resulting table
    pub skip_validation: bool,
}

/// Result of running the pipeline on one extract
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Sorted distinct substances
    pub categories: Vec<String>,

    /// Zone -> substance -> value lookup
    pub table: PivotTable,

    /// CSV parsing metadata
    pub csv_info: CsvInfo,
}

/// CSV file information
#[derive(Debug, Clone)]
pub struct CsvInfo {
    pub encoding: String,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Pivot a CSV extract from disk.
pub fn pivot_csv(path: &Path, options: &PipelineOptions) -> DriverResult<PipelineResult> {
    let parse_result = parse_csv_file(path, &options.columns)?;
    pivot_parsed(parse_result, options, &path.display().to_string())
}

/// Pivot CSV bytes.
///
/// Same as [`pivot_csv`] but accepts raw bytes instead of a file path.
pub fn pivot_bytes(bytes: &[u8], options: &PipelineOptions) -> DriverResult<PipelineResult> {
    let parse_result = parse_bytes(bytes, &options.columns)?;
    pivot_parsed(parse_result, options, "<bytes>")
}

/// Pivot records that were already parsed.
pub fn pivot_records(records: Vec<Record>, options: &PipelineOptions) -> DriverResult<PipelineResult> {
    let parse_result = ParseResult {
        records,
        encoding: "utf-8".to_string(),
        headers: vec![
            options.columns.category.clone(),
            options.columns.zone.clone(),
            options.columns.value.clone(),
        ],
    };
    pivot_parsed(parse_result, options, "<records>")
}

fn pivot_parsed(
    parse_result: ParseResult,
    options: &PipelineOptions,
    source: &str,
) -> DriverResult<PipelineResult> {
    let csv_info = CsvInfo {
        encoding: parse_result.encoding,
        headers: parse_result.headers,
        row_count: parse_result.records.len(),
    };
    log_info_indent(
        format!("{}: {} rows ({})", source, csv_info.row_count, csv_info.encoding),
        1,
    );

    if parse_result.records.is_empty() {
        log_warning(format!("{} has no data rows", source));
    }

    let records = parse_result.records;
    let categories = category_set(&records);
    let table = pivot_with(&records, &options.pivot)?;
    log_info_indent(
        format!("{} zones x {} substances", table.len(), categories.len()),
        1,
    );

    if !options.skip_validation {
        check_pivot_table(source, &table)?;
    }

    Ok(PipelineResult {
        categories,
        table,
        csv_info,
    })
}
