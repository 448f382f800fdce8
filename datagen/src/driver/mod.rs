//! File driver.
//!
//! Two entry points, both strictly sequential:
//!
//! - [`run_single`] - one named extract, writes `substances_list.json` and a
//!   pretty-printed lookup table
//! - [`run_quarters`] - every `YYYYQn.csv` extract of a directory, writes one
//!   compact lookup per period and the `quarters_list.json` manifest

pub mod discover;
pub mod quarters;
pub mod single;

use std::path::Path;

pub use discover::{discover_period_files, PeriodFile};
pub use quarters::{run_quarters, QuartersReport};
pub use single::{run_single, SingleFileReport};

/// File name used in progress messages.
fn artifact_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
