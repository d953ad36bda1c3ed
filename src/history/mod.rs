//! History Manager - caller-facing API
//!
//! Every operation is a task on the store's [`SerialQueue`]: load the current
//! document, apply the change in memory, save. Ordering (newest first) and
//! the entry cap are enforced here.
//!
//! Operations take their queue position when the method is called; the
//! returned future only waits for the result. Awaiting is still required to
//! observe errors.

mod config;
mod recorder;

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::HistoryResult;
use crate::queue::{QueueRegistry, SerialQueue};
use crate::store::JsonFileStore;
use crate::types::{EntryCounts, EntryDraft, FileType, HistoryEntry};
use crate::utils::{cleanup_temp_file, current_timestamp_millis};

pub use config::{
    default_history_file, HistoryConfig, APP_DIR_NAME, HISTORY_FILE_ENV, HISTORY_FILE_NAME,
    MAX_ENTRIES_ENV,
};
pub use recorder::{
    file_type_for_action, output_extension_for_action, ConversionOutcome, ConvertedFile,
    EXTRACT_MP3, MERGE_IMAGES_TO_PDF, PDF_PAGES_PREFIX,
};

/// Conversion history bound to one store
///
/// Cheap to clone; clones share the queue registry, so operations from any
/// clone against the same file are serialized together.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    registry: Arc<QueueRegistry>,
    store: JsonFileStore,
    max_entries: usize,
}

impl HistoryManager {
    /// Create a manager with its own queue registry
    pub fn new(config: HistoryConfig) -> Self {
        Self::with_registry(config, Arc::new(QueueRegistry::new()))
    }

    /// Create a manager sharing an existing queue registry
    ///
    /// A stale temp file from an interrupted save is removed here. A cap of
    /// zero is raised to one.
    pub fn with_registry(config: HistoryConfig, registry: Arc<QueueRegistry>) -> Self {
        remove_stale_temp(&config.history_file);

        Self {
            registry,
            store: JsonFileStore::new(&config.history_file),
            max_entries: config.max_entries.max(1),
        }
    }

    /// Same manager, bound to a different store
    ///
    /// Removes a stale temp file beside the new store like
    /// [`HistoryManager::with_registry`] does.
    pub fn at<P: AsRef<Path>>(&self, path: P) -> Self {
        remove_stale_temp(path.as_ref());

        Self {
            registry: Arc::clone(&self.registry),
            store: JsonFileStore::new(path),
            max_entries: self.max_entries,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn registry(&self) -> &Arc<QueueRegistry> {
        &self.registry
    }

    fn queue(&self) -> HistoryResult<SerialQueue> {
        self.registry.queue_for(self.store.path())
    }

    fn submit<T, F, Fut>(
        &self,
        task: F,
    ) -> impl Future<Output = HistoryResult<T>> + Send + 'static
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = HistoryResult<T>> + Send + 'static,
    {
        let queued = self.queue().map(|queue| queue.enqueue(task));
        async move { queued?.await }
    }

    /// All entries, newest first
    ///
    /// Runs as a read task on the queue, so the result reflects every
    /// operation submitted before this call.
    pub fn get_all(
        &self,
    ) -> impl Future<Output = HistoryResult<Vec<HistoryEntry>>> + Send + 'static {
        let store = self.store.clone();
        self.submit(move || read_all(store))
    }

    /// Record a new entry and return it
    ///
    /// Assigns a fresh id and the current time, puts the entry first and drops
    /// the oldest entries beyond the cap. If saving fails nothing changes on
    /// disk and the error is returned.
    pub fn add_entry(
        &self,
        draft: EntryDraft,
    ) -> impl Future<Output = HistoryResult<HistoryEntry>> + Send + 'static {
        let store = self.store.clone();
        let max_entries = self.max_entries;

        self.submit(move || add_task(store, draft, max_entries))
    }

    /// Remove the entry with `id`
    ///
    /// Returns `Ok(false)` without writing when no such entry exists.
    pub fn remove_entry(
        &self,
        id: impl Into<String>,
    ) -> impl Future<Output = HistoryResult<bool>> + Send + 'static {
        let store = self.store.clone();
        let id = id.into();

        self.submit(move || remove_task(store, id))
    }

    /// Remove every entry
    pub fn clear_all(&self) -> impl Future<Output = HistoryResult<()>> + Send + 'static {
        let store = self.store.clone();

        self.submit(move || clear_task(store))
    }

    /// Entries of one file type, newest first
    pub fn filter_by_type(
        &self,
        file_type: FileType,
    ) -> impl Future<Output = HistoryResult<Vec<HistoryEntry>>> + Send + 'static {
        let all = self.get_all();
        async move {
            let entries = all.await?;
            Ok(entries
                .into_iter()
                .filter(|e| e.file_type == file_type)
                .collect())
        }
    }

    /// Entry totals per file type
    pub fn get_entry_counts(
        &self,
    ) -> impl Future<Output = HistoryResult<EntryCounts>> + Send + 'static {
        let all = self.get_all();
        async move { Ok(EntryCounts::tally(&all.await?)) }
    }

    /// Log every file of a finished conversion
    ///
    /// Best effort: a failed add is logged and skipped so history problems
    /// never abort the conversion workflow. Returns how many entries were
    /// recorded.
    pub fn record_conversion(
        &self,
        outcome: &ConversionOutcome,
    ) -> impl Future<Output = usize> + Send + 'static {
        let action = outcome.action.clone();
        let pending: Vec<_> = outcome
            .drafts()
            .into_iter()
            .map(|draft| {
                let source = draft.source_file.clone();
                let added = self.add_entry(draft);
                async move { (source, added.await) }
            })
            .collect();

        async move {
            let mut recorded = 0;
            for (source, result) in futures::future::join_all(pending).await {
                match result {
                    Ok(_) => recorded += 1,
                    Err(e) => warn!(
                        action = %action,
                        source = %source,
                        error = %e,
                        "failed to add history entry"
                    ),
                }
            }
            recorded
        }
    }
}

fn remove_stale_temp(path: &Path) {
    match cleanup_temp_file(path) {
        Ok(true) => info!(
            path = %path.display(),
            "removed leftover temp file from interrupted save"
        ),
        Ok(false) => {}
        Err(e) => warn!(
            path = %path.display(),
            error = %e,
            "could not remove leftover temp file"
        ),
    }
}

async fn read_all(store: JsonFileStore) -> HistoryResult<Vec<HistoryEntry>> {
    Ok(store.load().await)
}

async fn add_task(
    store: JsonFileStore,
    draft: EntryDraft,
    max_entries: usize,
) -> HistoryResult<HistoryEntry> {
    let mut entries = store.load().await;

    let mut id = Uuid::new_v4().to_string();
    while entries.iter().any(|e| e.id == id) {
        id = Uuid::new_v4().to_string();
    }
    let entry = HistoryEntry::from_draft(draft, id, current_timestamp_millis());

    entries.insert(0, entry.clone());
    if entries.len() > max_entries {
        debug!(evicted = entries.len() - max_entries, "history cap reached");
        entries.truncate(max_entries);
    }

    store.save(entries).await?;
    debug!(id = %entry.id, file_type = %entry.file_type, "history entry added");
    Ok(entry)
}

async fn remove_task(store: JsonFileStore, id: String) -> HistoryResult<bool> {
    let mut entries = store.load().await;
    let Some(index) = entries.iter().position(|e| e.id == id) else {
        return Ok(false);
    };

    entries.remove(index);
    store.save(entries).await?;
    debug!(id = %id, "history entry removed");
    Ok(true)
}

async fn clear_task(store: JsonFileStore) -> HistoryResult<()> {
    store.save(Vec::new()).await?;
    debug!("history cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryStatus;
    use crate::utils::temp_path_for;
    use std::fs;
    use tempfile::TempDir;

    fn draft(name: &str, file_type: FileType) -> EntryDraft {
        EntryDraft::new(
            format!("{}.png", name),
            format!("{}.jpg", name),
            "BatchToJPG",
            file_type,
            EntryStatus::Success,
        )
    }

    fn create_test_manager() -> (HistoryManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = HistoryConfig::new(temp_dir.path().join("history.json"));
        let manager = HistoryManager::new(config);
        (manager, temp_dir)
    }

    #[tokio::test]
    async fn test_add_assigns_identity() {
        let (manager, _temp_dir) = create_test_manager();

        let entry = manager.add_entry(draft("a", FileType::Image)).await.unwrap();

        assert!(!entry.id.is_empty());
        assert!(entry.timestamp > 0);
        assert_eq!(manager.get_all().await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn test_small_cap_evicts_oldest() {
        let temp_dir = TempDir::new().unwrap();
        let manager = HistoryManager::new(
            HistoryConfig::new(temp_dir.path().join("history.json")).with_max_entries(3),
        );

        for i in 0..5 {
            manager.add_entry(draft(&format!("f{}", i), FileType::Image)).await.unwrap();
        }

        let sources: Vec<String> = manager
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.source_file)
            .collect();
        assert_eq!(sources, vec!["f4.png", "f3.png", "f2.png"]);
    }

    #[tokio::test]
    async fn test_zero_cap_is_raised_to_one() {
        let temp_dir = TempDir::new().unwrap();
        let manager = HistoryManager::new(
            HistoryConfig::new(temp_dir.path().join("history.json")).with_max_entries(0),
        );
        assert_eq!(manager.max_entries(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_does_not_write() {
        let (manager, _temp_dir) = create_test_manager();

        assert!(!manager.remove_entry("nope").await.unwrap());
        assert!(!manager.path().exists());
    }

    #[tokio::test]
    async fn test_startup_removes_stale_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        fs::write(temp_path_for(&path), "{\"version\":1,\"entr").unwrap();

        let _manager = HistoryManager::new(HistoryConfig::new(&path));

        assert!(!temp_path_for(&path).exists());
    }

    #[tokio::test]
    async fn test_at_removes_stale_temp_file() {
        let (manager, temp_dir) = create_test_manager();
        let other_path = temp_dir.path().join("other.json");
        fs::write(temp_path_for(&other_path), "{\"version\":1,\"entr").unwrap();

        let other = manager.at(&other_path);

        assert!(!temp_path_for(&other_path).exists());
        assert!(other.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_at_shares_registry() {
        let (manager, temp_dir) = create_test_manager();
        let other = manager.at(temp_dir.path().join("other.json"));

        manager.add_entry(draft("a", FileType::Image)).await.unwrap();
        other.add_entry(draft("b", FileType::Video)).await.unwrap();

        assert_eq!(manager.registry().len(), 2);
        assert_eq!(manager.get_all().await.unwrap().len(), 1);
        assert_eq!(other.get_all().await.unwrap()[0].file_type, FileType::Video);
    }

    #[tokio::test]
    async fn test_record_conversion_adds_one_entry_per_file() {
        let (manager, _temp_dir) = create_test_manager();
        let outcome = ConversionOutcome {
            action: "BatchToMP4".to_string(),
            output_dir: Some("/out".to_string()),
            files: vec![
                ConvertedFile::new("/in/a.mov", EntryStatus::Success),
                ConvertedFile::new("/in/b.mov", EntryStatus::Failed),
            ],
        };

        assert_eq!(manager.record_conversion(&outcome).await, 2);

        let entries = manager.get_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        // Submitted in file order, so the last file is newest
        assert_eq!(entries[0].source_file, "/in/b.mov");
        assert_eq!(entries[0].status, EntryStatus::Failed);
        assert_eq!(entries[1].output_file, "/out/a.mp4");
        assert!(entries.iter().all(|e| e.file_type == FileType::Video));
    }

    #[tokio::test]
    async fn test_record_conversion_is_best_effort() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        let manager = HistoryManager::new(HistoryConfig::new(blocker.join("history.json")));
        let outcome = ConversionOutcome {
            action: "BatchToPNG".to_string(),
            output_dir: None,
            files: vec![ConvertedFile::new("/in/a.jpg", EntryStatus::Success)],
        };

        assert_eq!(manager.record_conversion(&outcome).await, 0);
    }
}
