//! JSON file store for history documents

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tokio::task;
use tracing::{debug, error, warn};

use crate::error::{HistoryError, HistoryResult};
use crate::types::{HistoryDocument, HistoryEntry, HISTORY_VERSION};
use crate::utils::atomic_write;

/// Result of reading a history file, before the self-healing policy applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The document parsed; contains every valid entry in file order
    Loaded(Vec<HistoryEntry>),
    /// No backing file exists yet
    Missing,
    /// The file exists but could not be read or interpreted
    Corrupt(String),
}

impl LoadOutcome {
    /// Collapse to an entry list; anything but `Loaded` is empty
    pub fn into_entries(self) -> Vec<HistoryEntry> {
        match self {
            LoadOutcome::Loaded(entries) => entries,
            LoadOutcome::Missing | LoadOutcome::Corrupt(_) => Vec::new(),
        }
    }
}

/// A history document backed by a single JSON file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and classify the backing file without applying any fallback
    pub fn read_outcome(&self) -> LoadOutcome {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return LoadOutcome::Missing,
            Err(e) => return LoadOutcome::Corrupt(format!("unreadable: {}", e)),
        };
        parse_document(&self.path, &content)
    }

    /// Load entries, treating a missing or corrupt file as empty
    pub fn load_blocking(&self) -> Vec<HistoryEntry> {
        let outcome = self.read_outcome();
        self.settle(outcome)
    }

    /// Replace the backing file with `entries`
    pub fn save_blocking(&self, entries: Vec<HistoryEntry>) -> HistoryResult<()> {
        let count = entries.len();
        let content = HistoryDocument::new(entries).to_json_pretty()?;

        atomic_write(&self.path, &content).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "failed to write history");
            HistoryError::write(&self.path, e)
        })?;

        debug!(path = %self.path.display(), entries = count, "history saved");
        Ok(())
    }

    /// Async [`load_blocking`](Self::load_blocking) on the blocking pool
    pub async fn load(&self) -> Vec<HistoryEntry> {
        let store = self.clone();
        let outcome = match task::spawn_blocking(move || store.read_outcome()).await {
            Ok(outcome) => outcome,
            Err(e) => LoadOutcome::Corrupt(format!("reader task failed: {}", e)),
        };
        self.settle(outcome)
    }

    /// Async [`save_blocking`](Self::save_blocking) on the blocking pool
    pub async fn save(&self, entries: Vec<HistoryEntry>) -> HistoryResult<()> {
        let store = self.clone();
        task::spawn_blocking(move || store.save_blocking(entries))
            .await
            .map_err(|_| HistoryError::TaskAborted)?
    }

    fn settle(&self, outcome: LoadOutcome) -> Vec<HistoryEntry> {
        if let LoadOutcome::Corrupt(reason) = &outcome {
            warn!(
                path = %self.path.display(),
                reason = %reason,
                "invalid history file, treating as empty"
            );
        }
        outcome.into_entries()
    }
}

/// Parse a history document
///
/// The document must be an object with an `entries` array. Entries are
/// decoded one by one: malformed ones and repeated ids are skipped so a single
/// bad record does not discard the rest of the log.
fn parse_document(path: &Path, content: &str) -> LoadOutcome {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => return LoadOutcome::Corrupt(format!("invalid JSON: {}", e)),
    };

    let Some(object) = value.as_object() else {
        return LoadOutcome::Corrupt("document is not an object".to_string());
    };

    let Some(raw_entries) = object.get("entries").and_then(Value::as_array) else {
        return LoadOutcome::Corrupt("missing entries array".to_string());
    };

    if let Some(version) = object.get("version").and_then(Value::as_u64) {
        if version > u64::from(HISTORY_VERSION) {
            warn!(
                path = %path.display(),
                version,
                "history written by a newer version, reading known fields only"
            );
        }
    }

    let mut seen = HashSet::with_capacity(raw_entries.len());
    let mut entries = Vec::with_capacity(raw_entries.len());

    for (index, raw) in raw_entries.iter().enumerate() {
        match HistoryEntry::deserialize(raw) {
            Ok(entry) => {
                if seen.insert(entry.id.clone()) {
                    entries.push(entry);
                } else {
                    warn!(
                        path = %path.display(),
                        id = %entry.id,
                        "dropping duplicate history id"
                    );
                }
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    index,
                    error = %e,
                    "skipping malformed history entry"
                );
            }
        }
    }

    LoadOutcome::Loaded(entries)
}
