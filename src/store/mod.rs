//! Persistent Store
//!
//! Holds the entire ordered entry collection as one JSON document per file.
//! There is no caching: every load re-reads the file, and every save replaces
//! it atomically.
//!
//! ```text
//! load():  read file ──► LoadOutcome::{Loaded, Missing, Corrupt} ──► Vec<HistoryEntry>
//!                                                      (Corrupt = warn + empty)
//! save():  encode { version, entries } ──► write .tmp ──► fsync ──► rename
//! ```

mod json_store;

pub use json_store::{JsonFileStore, LoadOutcome};
