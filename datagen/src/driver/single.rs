//! Single-file mode: one extract, fixed artifact names.

use std::path::PathBuf;

use crate::config::SingleFileConfig;
use crate::error::{DriverError, DriverResult};
use crate::logs::{log_info, log_success};
use crate::output::{write_json, JsonStyle};
use crate::transform::pivot_csv;
use crate::validation::check_string_list;

use super::artifact_name;

/// What a single-file run produced.
#[derive(Debug, Clone)]
pub struct SingleFileReport {
    /// Sorted distinct substances of the extract
    pub categories: Vec<String>,
    /// Number of zones in the lookup table
    pub zone_count: usize,
    /// Files written, in order
    pub artifacts: Vec<PathBuf>,
}

/// Convert one extract into the substance list and a pretty-printed lookup table.
///
/// A missing input is reported as [`DriverError::InputNotFound`].
pub fn run_single(config: &SingleFileConfig) -> DriverResult<SingleFileReport> {
    log_info(format!("Processing {}...", config.input.display()));

    let result = match pivot_csv(&config.input, &config.pipeline) {
        Err(DriverError::Csv(e)) if e.is_not_found() => {
            return Err(DriverError::InputNotFound(config.input.clone()));
        }
        other => other?,
    };

    let mut artifacts = Vec::with_capacity(2);

    if !config.pipeline.skip_validation {
        check_string_list(&artifact_name(&config.categories_output), &result.categories)?;
    }
    write_json(&config.categories_output, &result.categories, JsonStyle::Compact)?;
    log_success(format!(
        "Successfully created {}",
        artifact_name(&config.categories_output)
    ));
    artifacts.push(config.categories_output.clone());

    write_json(&config.output, &result.table, JsonStyle::Pretty)?;
    log_success(format!("Successfully created {}", artifact_name(&config.output)));
    artifacts.push(config.output.clone());

    Ok(SingleFileReport {
        categories: result.categories,
        zone_count: result.table.len(),
        artifacts,
    })
}
