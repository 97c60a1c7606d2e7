//! Record sources feeding the statement controller.

pub mod sample;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{forest_from_str, RecordForest};
use crate::errors::{Result, StatementError};
use crate::grouping::LedgerEntry;

pub use sample::sample_forest;

const TMP_SUFFIX: &str = "tmp";

/// Abstraction over anything able to produce a record forest.
pub trait RecordSource {
    /// Short human description used in logs and error messages.
    fn describe(&self) -> String;
    fn load_forest(&self) -> Result<RecordForest>;
}

/// Reads a JSON array of nature nodes from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_forest(&self) -> Result<RecordForest> {
        let forest = load_forest_from_path(&self.path)
            .map_err(|err| StatementError::load(self.describe(), err))?;
        info!(path = %self.path.display(), natures = forest.len(), "Loaded record forest");
        Ok(forest)
    }
}

/// In-memory forest, handy for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    label: String,
    forest: RecordForest,
}

impl StaticSource {
    pub fn new(label: impl Into<String>, forest: RecordForest) -> Self {
        Self {
            label: label.into(),
            forest,
        }
    }

    /// The built-in demonstration statement.
    pub fn sample() -> Self {
        Self::new("sample", sample_forest())
    }
}

impl RecordSource for StaticSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn load_forest(&self) -> Result<RecordForest> {
        Ok(self.forest.clone())
    }
}

pub fn load_forest_from_path(path: &Path) -> Result<RecordForest> {
    let data = fs::read_to_string(path)?;
    forest_from_str(&data)
}

/// Writes a forest as pretty JSON through a temporary file.
pub fn save_forest_to_path(forest: &RecordForest, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(forest)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "Saved record forest");
    Ok(())
}

/// Reads a JSON array of flat ledger entries.
pub fn load_entries_from_path(path: &Path) -> Result<Vec<LedgerEntry>> {
    let source = path.display().to_string();
    let data = fs::read_to_string(path).map_err(|err| StatementError::load(&source, err))?;
    let entries: Vec<LedgerEntry> =
        serde_json::from_str(&data).map_err(|err| StatementError::load(&source, err))?;
    info!(path = %path.display(), entries = entries.len(), "Loaded ledger entries");
    Ok(entries)
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let extension = path
        .extension()
        .map(|ext| format!("{}.{TMP_SUFFIX}", ext.to_string_lossy()))
        .unwrap_or_else(|| TMP_SUFFIX.to_string());
    tmp.set_extension(extension);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn forest_survives_disk_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demonstrativo.json");
        save_forest_to_path(&sample_forest(), &path).unwrap();
        let loaded = JsonFileSource::new(&path).load_forest().unwrap();
        assert_eq!(loaded, sample_forest());
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempdir().unwrap();
        let err = JsonFileSource::new(dir.path().join("absent.json"))
            .load_forest()
            .unwrap_err();
        assert!(matches!(err, StatementError::Load { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn tmp_path_keeps_original_extension() {
        assert_eq!(tmp_path(Path::new("a/b.json")), PathBuf::from("a/b.json.tmp"));
        assert_eq!(tmp_path(Path::new("a/b")), PathBuf::from("a/b.tmp"));
    }
}
