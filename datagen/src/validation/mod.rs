//! JSON Schema validation for emitted artifacts.
//!
//! Every artifact is checked before it is written:
//!
//! - Lookup tables (`2019Q1.json`, `<period>.json`) against `pivot-table.json`,
//!   plus a completeness check that all zones carry the same substances
//! - Label lists (`substances_list.json`, `quarters_list.json`) against
//!   `string-list.json`
//!
//! Schemas are embedded at compile time from the `schemas/` directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use zip3_datagen::validation::{is_valid_pivot_table, validate_string_list};
//!
//! assert!(is_valid_pivot_table(&json!({ "100": { "X": 1.0, "Y": null } })));
//! assert!(validate_string_list(&json!(["2019Q1", "2019Q2"])).is_ok());
//! ```

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ValidationError, ValidationResult};
use crate::models::PivotTable;

static PIVOT_TABLE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/pivot-table.json"))
        .expect("Invalid embedded schema")
});

static STRING_LIST_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/string-list.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every error message otherwise
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Boolean shortcut for [`validate`].
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate against the lookup-table schema.
pub fn validate_pivot_table(data: &Value) -> Result<(), Vec<String>> {
    validate(&PIVOT_TABLE_SCHEMA, data)
}

/// Quick check against the lookup-table schema.
pub fn is_valid_pivot_table(data: &Value) -> bool {
    is_valid(&PIVOT_TABLE_SCHEMA, data)
}

/// Validate against the label-list schema.
pub fn validate_string_list(data: &Value) -> Result<(), Vec<String>> {
    validate(&STRING_LIST_SCHEMA, data)
}

/// Check a pivot table before it is written as `artifact`.
///
/// Besides the schema, every zone must list exactly the same substances.
pub fn check_pivot_table(artifact: &str, table: &PivotTable) -> ValidationResult<()> {
    let value = to_value(artifact, table)?;
    let mut errors = validate_pivot_table(&value).err().unwrap_or_default();

    let mut rows = table.iter();
    if let Some((first_zone, first_row)) = rows.next() {
        for (zone, row) in rows {
            if !row.keys().eq(first_row.keys()) {
                errors.push(format!(
                    "zone '{}' does not list the same substances as zone '{}'",
                    zone, first_zone
                ));
            }
        }
    }

    into_result(artifact, errors)
}

/// Check a label list before it is written as `artifact`.
pub fn check_string_list<T: Serialize>(artifact: &str, labels: &[T]) -> ValidationResult<()> {
    let value = to_value(artifact, labels)?;
    let errors = validate_string_list(&value).err().unwrap_or_default();
    into_result(artifact, errors)
}

fn to_value<T: Serialize + ?Sized>(artifact: &str, data: &T) -> ValidationResult<Value> {
    serde_json::to_value(data).map_err(|source| ValidationError::Json {
        artifact: artifact.to_string(),
        source,
    })
}

fn into_result(artifact: &str, errors: Vec<String>) -> ValidationResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Schema {
            artifact: artifact.to_string(),
            errors,
        })
    }
}
