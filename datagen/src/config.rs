//! Run configuration.
//!
//! Defaults reproduce the reference layout: inputs and outputs in the current
//! directory, fixed artifact names. `ZIP3_DATA_DIR`, `ZIP3_OUT_DIR` and
//! `ZIP3_DUPLICATES` (read after `.env` is loaded) change the defaults; CLI
//! flags override both.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{DriverError, DriverResult};
use crate::transform::{DuplicatePolicy, PipelineOptions};

/// Input of single-file mode.
pub const DEFAULT_SINGLE_INPUT: &str = "2019Q1.csv";
/// Lookup table written by single-file mode.
pub const DEFAULT_SINGLE_OUTPUT: &str = "2019Q1.json";
/// Substance list written by single-file mode.
pub const SUBSTANCES_LIST_FILE: &str = "substances_list.json";
/// Manifest written by quarters mode.
pub const QUARTERS_LIST_FILE: &str = "quarters_list.json";
/// Discovery pattern of quarters mode.
pub const PERIOD_FILE_PATTERN: &str = "????Q?.csv";

pub const ENV_DATA_DIR: &str = "ZIP3_DATA_DIR";
pub const ENV_OUT_DIR: &str = "ZIP3_OUT_DIR";
pub const ENV_DUPLICATES: &str = "ZIP3_DUPLICATES";

/// Environment-level defaults shared by both modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub duplicates: DuplicatePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            out_dir: PathBuf::from("."),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> DriverResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> DriverResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(dir) = get(ENV_DATA_DIR) {
            settings.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(ENV_OUT_DIR) {
            settings.out_dir = PathBuf::from(dir);
        }
        if let Some(policy) = get(ENV_DUPLICATES) {
            settings.duplicates = policy
                .parse()
                .map_err(|e| DriverError::Config(format!("{}: {}", ENV_DUPLICATES, e)))?;
        }

        Ok(settings)
    }
}

/// Join `name` onto `dir`, leaving bare names in the current directory.
fn resolve(dir: &Path, name: &str) -> PathBuf {
    if dir == Path::new(".") {
        PathBuf::from(name)
    } else {
        dir.join(name)
    }
}

/// Single-file mode: one extract, fixed output names.
#[derive(Debug, Clone)]
pub struct SingleFileConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub categories_output: PathBuf,
    pub pipeline: PipelineOptions,
}

impl SingleFileConfig {
    /// Reference file names resolved against the settings' directories.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut pipeline = PipelineOptions::default();
        pipeline.pivot.duplicates = settings.duplicates;
        Self {
            input: resolve(&settings.data_dir, DEFAULT_SINGLE_INPUT),
            output: resolve(&settings.out_dir, DEFAULT_SINGLE_OUTPUT),
            categories_output: resolve(&settings.out_dir, SUBSTANCES_LIST_FILE),
            pipeline,
        }
    }
}

impl Default for SingleFileConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Quarters mode: every period extract in a directory.
#[derive(Debug, Clone)]
pub struct QuartersConfig {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub pattern: String,
    pub manifest: PathBuf,
    pub pipeline: PipelineOptions,
}

impl QuartersConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut pipeline = PipelineOptions::default();
        pipeline.pivot.duplicates = settings.duplicates;
        Self {
            data_dir: settings.data_dir.clone(),
            out_dir: settings.out_dir.clone(),
            pattern: PERIOD_FILE_PATTERN.to_string(),
            manifest: resolve(&settings.out_dir, QUARTERS_LIST_FILE),
            pipeline,
        }
    }
}

impl Default for QuartersConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_reference_layout() {
        let single = SingleFileConfig::default();
        assert_eq!(single.input, Path::new("2019Q1.csv"));
        assert_eq!(single.output, Path::new("2019Q1.json"));
        assert_eq!(single.categories_output, Path::new("substances_list.json"));

        let quarters = QuartersConfig::default();
        assert_eq!(quarters.pattern, "????Q?.csv");
        assert_eq!(quarters.manifest, Path::new("quarters_list.json"));
        assert_eq!(quarters.pipeline.pivot.duplicates, DuplicatePolicy::Mean);
    }

    #[test]
    fn test_settings_from_lookup() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_DATA_DIR, "raw"),
            (ENV_OUT_DIR, "public/data"),
            (ENV_DUPLICATES, "last"),
        ]))
        .unwrap();

        assert_eq!(settings.data_dir, PathBuf::from("raw"));
        assert_eq!(settings.out_dir, PathBuf::from("public/data"));
        assert_eq!(settings.duplicates, DuplicatePolicy::Last);

        let quarters = QuartersConfig::from_settings(&settings);
        assert_eq!(quarters.manifest, Path::new("public/data/quarters_list.json"));
        assert_eq!(quarters.pipeline.pivot.duplicates, DuplicatePolicy::Last);
    }

    #[test]
    fn test_not_found_message_uses_bare_name() {
        let single = SingleFileConfig::default();
        let err = DriverError::InputNotFound(single.input);
        assert_eq!(
            err.to_string(),
            "Make sure '2019Q1.csv' is in the same directory as this script."
        );

        let nested = SingleFileConfig::from_settings(&Settings {
            data_dir: PathBuf::from("raw"),
            ..Settings::default()
        });
        assert_eq!(nested.input, Path::new("raw/2019Q1.csv"));
    }

    #[test]
    fn test_empty_values_ignored() {
        let settings = Settings::from_lookup(lookup(&[(ENV_OUT_DIR, "  ")])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_duplicate_policy() {
        let err = Settings::from_lookup(lookup(&[(ENV_DUPLICATES, "sum")])).unwrap_err();
        assert!(matches!(err, DriverError::Config(ref m) if m.contains("ZIP3_DUPLICATES")));
    }
}
