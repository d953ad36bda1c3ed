//! History configuration

use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::types::MAX_ENTRIES;

/// File name of the production history document
pub const HISTORY_FILE_NAME: &str = "conversion-history.json";

/// Directory under the platform data dir that holds the history file
pub const APP_DIR_NAME: &str = "conversion-history";

/// Environment variable overriding the history file location
pub const HISTORY_FILE_ENV: &str = "CONVERSION_HISTORY_FILE";

/// Environment variable overriding the entry cap
pub const MAX_ENTRIES_ENV: &str = "CONVERSION_HISTORY_MAX_ENTRIES";

/// Configuration for a history manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Path to the backing JSON document
    pub history_file: PathBuf,
    /// Maximum number of entries kept; oldest are evicted first
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            history_file: default_history_file(),
            max_entries: MAX_ENTRIES,
        }
    }
}

impl HistoryConfig {
    /// Create config for a specific history file
    pub fn new<P: AsRef<Path>>(history_file: P) -> Self {
        Self {
            history_file: history_file.as_ref().to_path_buf(),
            max_entries: MAX_ENTRIES,
        }
    }

    /// Set the entry cap
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Load configuration from environment variables
    ///
    /// `CONVERSION_HISTORY_FILE` sets the document path (relative paths are
    /// resolved against the current directory). `CONVERSION_HISTORY_MAX_ENTRIES`
    /// sets the cap; invalid or zero values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = env::var(HISTORY_FILE_ENV) {
            let path = PathBuf::from(path);
            config.history_file = if path.is_absolute() {
                path
            } else {
                env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(path)
            };
        }

        if let Ok(raw) = env::var(MAX_ENTRIES_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_entries = n,
                _ => warn!(value = %raw, "ignoring invalid {}", MAX_ENTRIES_ENV),
            }
        }

        config
    }
}

/// Platform data dir location of the history file, or the working directory
pub fn default_history_file() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(APP_DIR_NAME).join(HISTORY_FILE_NAME),
        None => env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(HISTORY_FILE_NAME),
    }
}
