//! Data types for the conversion history log
//!
//! This module contains the entry record, its caller-supplied draft, the
//! closed file-type and status sets, and the persisted document shape.

mod document;
mod entry;

pub use document::{HistoryDocument, HISTORY_VERSION};
pub use entry::{EntryCounts, EntryDraft, EntryStatus, FileType, HistoryEntry};

/// Maximum number of entries retained per store
pub const MAX_ENTRIES: usize = 100;
