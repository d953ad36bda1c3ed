//! Atomic file operations
//!
//! Saves replace the history file as a whole, so a crash or a failed write
//! must never leave a truncated document behind.
//!
//! # Pattern
//!
//! 1. Write to a sibling temporary file (`<name>.tmp`)
//! 2. Call sync_all() to flush to disk
//! 3. Rename temp file over the final path (atomic on most filesystems)
//!
//! The final file is therefore either the old version or the new one.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Sibling temp path used while replacing `path`
///
/// The suffix is appended rather than substituted so `history.json` and
/// `history.tmp` never collide.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("history"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Atomically replace `path` with `content`
///
/// Creates missing parent directories. On failure the temp file is removed
/// and the previous content of `path` is left untouched.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let result = write_and_rename(&temp_path, path, content);
    if result.is_err() && temp_path.is_file() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_rename(temp_path: &Path, path: &Path, content: &str) -> io::Result<()> {
    let mut file = File::create(temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(temp_path, path)
}

/// Remove a temp file left behind by an interrupted write of `path`
///
/// Returns `Ok(true)` if a stale file was removed.
pub fn cleanup_temp_file<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    let temp_path = temp_path_for(path.as_ref());
    if !temp_path.is_file() {
        return Ok(false);
    }
    fs::remove_file(&temp_path)?;
    Ok(true)
}
