//! Quarters mode: one compact lookup per period plus the period manifest.

use std::path::PathBuf;

use crate::config::QuartersConfig;
use crate::error::{DriverError, DriverResult};
use crate::logs::{log_info, log_success};
use crate::models::PeriodCode;
use crate::output::{write_json, JsonStyle};
use crate::transform::pivot_csv;
use crate::validation::check_string_list;

use super::artifact_name;
use super::discover::discover_period_files;

/// What a quarters run produced.
#[derive(Debug, Clone)]
pub struct QuartersReport {
    /// Periods processed, in file-name order
    pub periods: Vec<PeriodCode>,
    /// Files written, in order (manifest last)
    pub artifacts: Vec<PathBuf>,
}

/// Convert every period extract found in the data directory.
///
/// Stops at the first failing file; artifacts already written stay, the
/// manifest is only written once every file succeeded.
pub fn run_quarters(config: &QuartersConfig) -> DriverResult<QuartersReport> {
    let files = discover_period_files(&config.data_dir, &config.pattern)?;
    if files.is_empty() {
        return Err(DriverError::NoInputFiles {
            pattern: config.pattern.clone(),
        });
    }

    log_info(format!("Found {} CSV files to process...", files.len()));

    let mut periods = Vec::with_capacity(files.len());
    let mut artifacts = Vec::with_capacity(files.len() + 1);

    for file in files {
        let result = pivot_csv(&file.path, &config.pipeline)?;

        let target = config.out_dir.join(file.period.artifact_name());
        write_json(&target, &result.table, JsonStyle::Compact)?;
        log_success(format!("Successfully created {}", artifact_name(&target)));

        artifacts.push(target);
        periods.push(file.period);
    }

    if !config.pipeline.skip_validation {
        check_string_list(&artifact_name(&config.manifest), &periods)?;
    }
    write_json(&config.manifest, &periods, JsonStyle::Pretty)?;
    log_success(format!("Successfully created {}", artifact_name(&config.manifest)));
    artifacts.push(config.manifest.clone());

    Ok(QuartersReport { periods, artifacts })
}
