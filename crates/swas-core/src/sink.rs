//! Forecast sinks
//!
//! A sink receives the whole forecast window and replaces whatever it held
//! before. Implementations:
//! - `JsonFileSink` writes a pretty-printed JSON file
//! - `Database` (see `db`) replaces the `forecast` table

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::ForecastOutputRow;

/// Destination for a computed forecast window
pub trait ForecastSink: Send + Sync {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    /// Replace all previously stored rows with `rows`
    ///
    /// Returns the number of rows stored.
    fn replace_all(&self, rows: &[ForecastOutputRow]) -> Result<usize>;
}

/// Write `value` as pretty JSON, replacing `path` in one rename
///
/// The parent directory is created when missing. Readers never see a
/// half-written file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| {
        Error::Sink(format!(
            "Failed to create output directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let tmp = NamedTempFile::new_in(&dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    tmp.persist(path)
        .map_err(|e| Error::Sink(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(())
}

/// Forecast window written to a JSON file
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ForecastSink for JsonFileSink {
    fn name(&self) -> &str {
        "json"
    }

    fn replace_all(&self, rows: &[ForecastOutputRow]) -> Result<usize> {
        write_json_atomic(&self.path, rows)?;
        info!("Wrote {} forecast rows to {}", rows.len(), self.path.display());
        Ok(rows.len())
    }
}
