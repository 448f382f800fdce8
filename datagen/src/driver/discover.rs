//! Discovery of period extracts (`2019Q1.csv`, `2019Q2.csv`, ...).

use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

use crate::error::DriverResult;
use crate::logs::log_warning;
use crate::models::PeriodCode;

/// An input file together with the period its name encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodFile {
    pub path: PathBuf,
    pub period: PeriodCode,
}

/// Find files in `dir` matching `pattern`, sorted by file name.
///
/// Matches whose stem is not a valid period code are skipped with a warning.
pub fn discover_period_files(dir: &Path, pattern: &str) -> DriverResult<Vec<PeriodFile>> {
    let full_pattern = format!("{}/{}", Pattern::escape(&dir.to_string_lossy()), pattern);

    let mut paths = Vec::new();
    for entry in glob(&full_pattern)? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match PeriodCode::from_path(&path) {
            Some(period) => files.push(PeriodFile { path, period }),
            None => log_warning(format!(
                "Skipping {}: name is not a YYYYQ[1-4] period",
                path.display()
            )),
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PERIOD_FILE_PATTERN;
    use crate::logs::{LogLevel, PROGRESS_LOG};
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "substance,zip3,gramsper100K\n").unwrap();
    }

    #[test]
    fn test_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        for name in ["2020Q1.csv", "2019Q4.csv", "2019Q1.csv", "notes.csv", "2019Q1.json", "2019QX.csv"] {
            touch(dir.path(), name);
        }
        fs::create_dir(dir.path().join("2018Q1.csv")).unwrap();
        let rx = PROGRESS_LOG.subscribe();

        let files = discover_period_files(dir.path(), PERIOD_FILE_PATTERN).unwrap();
        let periods: Vec<&str> = files.iter().map(|f| f.period.as_str()).collect();

        assert_eq!(periods, vec!["2019Q1", "2019Q4", "2020Q1"]);
        assert_eq!(files[0].path, dir.path().join("2019Q1.csv"));
        assert!(rx
            .try_iter()
            .any(|e| e.level == LogLevel::Warning && e.message.contains("2019QX.csv")));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(discover_period_files(dir.path(), PERIOD_FILE_PATTERN).unwrap().is_empty());
    }

    #[test]
    fn test_directory_with_glob_characters() {
        let dir = tempdir().unwrap();
        let odd = dir.path().join("data[2019]");
        fs::create_dir(&odd).unwrap();
        touch(&odd, "2019Q2.csv");

        let files = discover_period_files(&odd, PERIOD_FILE_PATTERN).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].period.as_str(), "2019Q2");
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempdir().unwrap();
        assert!(discover_period_files(dir.path(), "[").is_err());
    }
}
