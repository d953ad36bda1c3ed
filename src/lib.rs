//! Conversion History
//!
//! A small persistent log of file-conversion outcomes. Each history file is
//! one JSON document holding at most [`MAX_ENTRIES`] records, newest first.
//!
//! # Features
//!
//! - **Serialized writers**: every store has its own FIFO queue, so concurrent
//!   adds and removes never lose each other's updates
//! - **Crash-safe saves**: documents are replaced via temp file + rename
//! - **Self-healing reads**: a missing or corrupt file reads as empty
//! - **UI bridge**: JSON-RPC over stdio with `{ ok, data | error }` replies
//!
//! # Modules
//!
//! - `types`: Entry, draft, file type, status, counts, document
//! - `store`: JSON file persistence
//! - `queue`: Per-store serial task queues and their registry
//! - `history`: The history manager, configuration, conversion recording
//! - `protocol`: JSON-RPC and reply envelope types
//! - `server`: stdio bridge for the UI process
//! - `utils`: Atomic writes and timestamps
//!
//! # Example
//!
//! ```no_run
//! use conversion_history::{EntryDraft, EntryStatus, FileType, HistoryConfig, HistoryManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), conversion_history::HistoryError> {
//!     let history = HistoryManager::new(HistoryConfig::from_env());
//!     let draft = EntryDraft::new(
//!         "a.png",
//!         "a.jpg",
//!         "BatchToJPG",
//!         FileType::Image,
//!         EntryStatus::Success,
//!     );
//!     let entry = history.add_entry(draft).await?;
//!     assert_eq!(history.get_all().await?[0].id, entry.id);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod history;
pub mod protocol;
pub mod queue;
pub mod server;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use error::{HistoryError, HistoryResult};
pub use history::{ConversionOutcome, ConvertedFile, HistoryConfig, HistoryManager};
pub use queue::{QueueRegistry, SerialQueue};
pub use server::HistoryServer;
pub use store::{JsonFileStore, LoadOutcome};
pub use types::{
    EntryCounts, EntryDraft, EntryStatus, FileType, HistoryDocument, HistoryEntry, MAX_ENTRIES,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
