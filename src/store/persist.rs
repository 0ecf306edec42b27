//! Whole-document file persistence
//!
//! The document is read in one piece and written in one piece. Writes go to
//! a sibling temp file which is fsynced and then renamed over the target, so
//! a failed commit never leaves a half-written store behind.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};

/// Reads the file at `path`.
///
/// # Errors
///
/// `StoreNotFound` if `path` is not an existing regular file.
pub fn read_document(path: &Path) -> StoreResult<String> {
    if !path.is_file() {
        return Err(StoreError::StoreNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| StoreError::io(path, e))
}

/// Atomically replaces the file at `path` with `contents`.
///
/// Steps:
/// 1. Write `<path>.tmp`
/// 2. fsync the temp file
/// 3. Rename it over `path`
/// 4. fsync the parent directory (best effort)
pub fn write_atomic(path: &Path, contents: &str, create_dirs: bool) -> StoreResult<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());

    if create_dirs {
        if let Some(parent) = parent {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
    }

    let temp_path = temp_path(path);
    let result = write_and_rename(&temp_path, path, contents);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
        return result;
    }

    if let Some(parent) = parent {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

fn write_and_rename(temp_path: &Path, path: &Path, contents: &str) -> StoreResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| StoreError::io(temp_path, e))?;

    file.write_all(contents.as_bytes())
        .map_err(|e| StoreError::io(temp_path, e))?;
    file.sync_all().map_err(|e| StoreError::io(temp_path, e))?;
    drop(file);

    fs::rename(temp_path, path).map_err(|e| StoreError::io(path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
