//! Whole-file JSON persistence shared by the stores.
//!
//! Both stores keep every record in memory and rewrite the backing file in one
//! go. Reads are forgiving (a missing or corrupt file is an empty store) and
//! writes go through a sibling temp file that is renamed into place, so a crash
//! mid-write leaves the previous file intact.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error_handling::StoreError;

/// Loads a JSON array of records from `path`.
///
/// Returns an empty vector when the file does not exist, cannot be read, or
/// does not parse. Failures other than "not found" are logged as warnings.
pub(crate) fn load_records<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No store file at {}, starting empty", path.display());
            return Vec::new();
        }
        Err(e) => {
            log::warn!(
                "Failed to read store file {}: {}. Starting empty.",
                path.display(),
                e
            );
            return Vec::new();
        }
    };

    if content.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<T>>(&content) {
        Ok(records) => records,
        Err(e) => {
            log::warn!(
                "Store file {} is corrupt ({}). Starting empty.",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}

/// Writes `records` to `path` as a pretty-printed JSON array with sorted keys.
///
/// Parent directories are created as needed. Callers are responsible for the
/// order of the records themselves.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if a record cannot be converted to JSON
/// and `StoreError::Io` if the directory, temp file, or rename fails.
pub(crate) fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
    }

    // Round-tripping through `Value` sorts object keys (serde_json maps are
    // BTreeMaps unless `preserve_order` is enabled).
    let value = serde_json::to_value(records)?;
    let mut content = serde_json::to_string_pretty(&value)?;
    content.push('\n');

    let tmp_path = temp_path_for(path);
    std::fs::write(&tmp_path, content).map_err(|source| io_error(&tmp_path, source))?;
    std::fs::rename(&tmp_path, path).map_err(|source| io_error(path, source))?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
