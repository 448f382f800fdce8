//! JSON artifact writer.
//!
//! Artifacts are serialized in memory, written to a temp file in the target
//! directory and renamed into place, so a failed run never leaves a
//! truncated file behind.

use serde::Serialize;
use serde_json::ser::Formatter;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{OutputError, OutputResult};

/// Layout of a JSON artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStyle {
    /// Single line, `", "` between items and `": "` after keys.
    Compact,
    /// 2-space indentation.
    Pretty,
}

/// Single-line formatter with a space after each separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Serialize `value` in the given style.
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T, style: JsonStyle) -> OutputResult<Vec<u8>> {
    let bytes = match style {
        JsonStyle::Compact => {
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
            value.serialize(&mut ser)?;
            buf
        }
        JsonStyle::Pretty => serde_json::to_vec_pretty(value)?,
    };
    Ok(bytes)
}

/// Atomically write `value` as JSON to `path`.
///
/// Missing parent directories are created.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, style: JsonStyle) -> OutputResult<()> {
    let bytes = to_json_bytes(value, style)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| OutputError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}
