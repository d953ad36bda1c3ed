//! On-disk document wrapping the entry list

use serde::{Deserialize, Serialize};

use super::HistoryEntry;

/// Document version written by this crate
pub const HISTORY_VERSION: u32 = 1;

/// The whole persisted history: `{ "version": 1, "entries": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub entries: Vec<HistoryEntry>,
}

fn default_version() -> u32 {
    HISTORY_VERSION
}

impl HistoryDocument {
    /// Wrap entries in a current-version document
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self {
            version: HISTORY_VERSION,
            entries,
        }
    }

    /// Pretty-printed JSON for the backing file
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
