//! Error types for the zip3 data generation pipeline.
//!
//! - [`CsvError`] - reading and decoding input extracts
//! - [`PivotError`] - record validation inside the pivot transform
//! - [`OutputError`] - serializing and writing JSON artifacts
//! - [`ValidationError`] - schema checks on artifacts
//! - [`DriverError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors while reading a CSV extract.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content.
    #[error("Invalid CSV format: {0}")]
    Parse(#[from] csv::Error),

    /// File has no header row.
    #[error("CSV file is empty")]
    EmptyFile,

    /// A required column is absent from the header row.
    #[error("Missing column '{0}' in CSV header")]
    MissingColumn(String),

    /// A required field is empty on a data row.
    #[error("Line {line}, column '{column}': value is missing")]
    MissingField { line: u64, column: String },

    /// A numeric field could not be parsed.
    #[error("Line {line}, column '{column}' (value '{value}'): not a number")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },
}

impl CsvError {
    /// True when the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CsvError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

// =============================================================================
// Pivot Errors
// =============================================================================

/// Errors raised by the pivot transform.
#[derive(Debug, Error)]
pub enum PivotError {
    /// Record has an empty zone identifier.
    #[error("Record {index} has no zone")]
    MissingZone { index: usize },

    /// Record has an empty category label.
    #[error("Record {index} (zone '{zone}') has no category")]
    MissingCategory { index: usize, zone: String },

    /// More than one record for the same cell while duplicates are rejected.
    #[error("Duplicate record for zone '{zone}' and category '{category}'")]
    DuplicateCell { zone: String, category: String },
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing JSON artifacts.
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error.
    #[error("Output IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Temp file could not be moved into place.
    #[error("Failed to finalize {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors from schema validation of artifacts.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Artifact does not match its embedded schema.
    #[error("{artifact} failed schema validation: {errors:?}")]
    Schema {
        artifact: String,
        errors: Vec<String>,
    },

    /// Artifact could not be converted to JSON for validation.
    #[error("Cannot validate {artifact}: {source}")]
    Json {
        artifact: String,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Driver Errors (top-level)
// =============================================================================

/// Top-level driver errors.
///
/// Returned by [`crate::driver::run_single`] and [`crate::driver::run_quarters`].
#[derive(Debug, Error)]
pub enum DriverError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Pivot transform error.
    #[error("Pivot error: {0}")]
    Pivot(#[from] PivotError),

    /// Artifact writing error.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Artifact validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The single input file does not exist.
    #[error("Make sure '{}' is in the same directory as this script.", .0.display())]
    InputNotFound(PathBuf),

    /// Discovery found nothing to process.
    #[error("No CSV files found matching the pattern '{pattern}'.")]
    NoInputFiles { pattern: String },

    /// Invalid discovery pattern.
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A discovered path could not be read.
    #[error("File discovery failed: {0}")]
    Glob(#[from] glob::GlobError),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DriverError {
    /// Conditions reported with a friendly message and a clean exit.
    pub fn is_non_fatal(&self) -> bool {
        matches!(
            self,
            DriverError::InputNotFound(_) | DriverError::NoInputFiles { .. }
        )
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pivot operations.
pub type PivotResult<T> = Result<T, PivotError>;

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptyFile;
        let driver_err: DriverError = csv_err.into();
        assert!(driver_err.to_string().contains("empty"));

        let pivot_err = PivotError::DuplicateCell {
            zone: "100".into(),
            category: "X".into(),
        };
        let driver_err: DriverError = pivot_err.into();
        assert!(driver_err.to_string().contains("'100'"));
        assert!(!driver_err.is_non_fatal());
    }

    #[test]
    fn test_invalid_number_format() {
        let err = CsvError::InvalidNumber {
            line: 5,
            column: "gramsper100K".into(),
            value: "abc".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Line 5"));
        assert!(msg.contains("column 'gramsper100K'"));
        assert!(msg.contains("value 'abc'"));
    }

    #[test]
    fn test_schema_error_format() {
        let err = ValidationError::Schema {
            artifact: "2019Q1.json".into(),
            errors: vec!["\"x\" is not of type \"number\"".into()],
        };
        let driver_err: DriverError = err.into();
        let msg = driver_err.to_string();
        assert!(msg.contains("2019Q1.json"));
        assert!(msg.contains("not of type"));
    }

    #[test]
    fn test_not_found_classification() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(CsvError::Io(io).is_not_found());
        assert!(!CsvError::EmptyFile.is_not_found());

        assert!(DriverError::InputNotFound(PathBuf::from("2019Q1.csv")).is_non_fatal());
        assert!(DriverError::NoInputFiles {
            pattern: "????Q?.csv".into()
        }
        .is_non_fatal());
    }

    #[test]
    fn test_input_not_found_message() {
        let err = DriverError::InputNotFound(PathBuf::from("2019Q1.csv"));
        assert_eq!(
            err.to_string(),
            "Make sure '2019Q1.csv' is in the same directory as this script."
        );
    }
}
