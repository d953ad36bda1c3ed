//! Registry of per-store queues

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use super::SerialQueue;
use crate::error::HistoryResult;

/// Maps each store path to its queue
///
/// Queues are created on first use and live as long as the registry. Build one
/// registry per application (or per test) and share it by reference.
#[derive(Debug, Default)]
pub struct QueueRegistry {
    queues: Mutex<HashMap<PathBuf, SerialQueue>>,
}

impl QueueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the queue for `path`
    ///
    /// Paths are keyed by their absolute form so `./h.json` and `h.json`
    /// share a queue. Creating a queue needs a running tokio runtime.
    pub fn queue_for(&self, path: &Path) -> HistoryResult<SerialQueue> {
        let key = store_key(path);
        let mut queues = self.queues.lock();

        if let Some(queue) = queues.get(&key) {
            return Ok(queue.clone());
        }

        let queue = SerialQueue::spawn(key.to_string_lossy().into_owned())?;
        debug!(path = %key.display(), "created history queue");
        queues.insert(key, queue.clone());
        Ok(queue)
    }

    /// Number of stores that have a queue
    pub fn len(&self) -> usize {
        self.queues.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.lock().is_empty()
    }
}

fn store_key(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
