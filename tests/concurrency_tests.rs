//! Concurrency tests
//!
//! Concurrent callers against one store must never lose each other's
//! updates; separate stores must not interfere.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tempfile::TempDir;

use conversion_history::{
    EntryDraft, EntryStatus, FileType, HistoryConfig, HistoryManager, QueueRegistry,
};

fn setup_manager() -> (HistoryManager, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let manager = HistoryManager::new(HistoryConfig::new(temp_dir.path().join("history.json")));
    (manager, temp_dir)
}

fn draft(source: &str) -> EntryDraft {
    EntryDraft::new(
        source,
        source.replace(".png", ".jpg"),
        "BatchToJPG",
        FileType::Image,
        EntryStatus::Success,
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_lose_nothing() {
    let (manager, _temp_dir) = setup_manager();

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.add_entry(draft(&format!("file-{}.png", i))).await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    let entries = manager.get_all().await.unwrap();
    assert_eq!(entries.len(), 5);

    let ids: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), 5);

    let mut sources: Vec<&str> = entries.iter().map(|e| e.source_file.as_str()).collect();
    sources.sort();
    assert_eq!(
        sources,
        vec!["file-0.png", "file-1.png", "file-2.png", "file-3.png", "file-4.png"]
    );

    for result in &results {
        let found = entries.iter().find(|e| e.id == result.id).unwrap();
        assert_eq!(found.source_file, result.source_file);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_add_and_remove() {
    let (manager, _temp_dir) = setup_manager();

    let entry1 = manager.add_entry(draft("file-1.png")).await.unwrap();
    let entry2 = manager.add_entry(draft("file-2.png")).await.unwrap();
    let entry3 = manager.add_entry(draft("file-3.png")).await.unwrap();

    let (add4, add5, removed) = tokio::join!(
        manager.add_entry(draft("file-4.png")),
        manager.add_entry(draft("file-5.png")),
        manager.remove_entry(entry2.id.clone()),
    );
    add4.unwrap();
    add5.unwrap();
    assert!(removed.unwrap());

    let entries = manager.get_all().await.unwrap();
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|e| e.id != entry2.id));
    assert!(entries.iter().any(|e| e.id == entry1.id));
    assert!(entries.iter().any(|e| e.id == entry3.id));
    assert!(entries.iter().any(|e| e.source_file == "file-4.png"));
    assert!(entries.iter().any(|e| e.source_file == "file-5.png"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_adds_respect_cap() {
    let temp_dir = TempDir::new().unwrap();
    let manager = HistoryManager::new(
        HistoryConfig::new(temp_dir.path().join("history.json")).with_max_entries(10),
    );

    let pending: Vec<_> = (0..25)
        .map(|i| manager.add_entry(draft(&format!("f{}.png", i))))
        .collect();
    for result in join_all(pending).await {
        result.unwrap();
    }

    let entries = manager.get_all().await.unwrap();
    assert_eq!(entries.len(), 10);
    // Submitted in order, so the newest is the last submitted
    assert_eq!(entries[0].source_file, "f24.png");
    assert_eq!(entries[9].source_file, "f15.png");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_get_all_sees_earlier_submissions() {
    let (manager, _temp_dir) = setup_manager();

    // Not awaited before get_all is called; submission order still applies
    let add = manager.add_entry(draft("queued.png"));
    let read = manager.get_all();

    let (added, entries) = tokio::join!(add, read);
    assert_eq!(entries.unwrap()[0].id, added.unwrap().id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_clones_and_shared_registry_serialize_together() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("history.json");
    let registry = Arc::new(QueueRegistry::new());
    let first = HistoryManager::with_registry(HistoryConfig::new(&path), Arc::clone(&registry));
    let second = HistoryManager::with_registry(HistoryConfig::new(&path), Arc::clone(&registry));

    let pending: Vec<_> = (0..10)
        .map(|i| {
            let manager = if i % 2 == 0 { &first } else { &second };
            manager.add_entry(draft(&format!("f{}.png", i)))
        })
        .collect();
    for result in join_all(pending).await {
        result.unwrap();
    }

    assert_eq!(first.get_all().await.unwrap().len(), 10);
    assert_eq!(registry.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stores_are_independent() {
    let (manager, temp_dir) = setup_manager();
    let other = manager.at(temp_dir.path().join("other.json"));

    let (a, b, cleared) = tokio::join!(
        manager.add_entry(draft("a.png")),
        other.add_entry(draft("b.png")),
        other.clear_all(),
    );
    a.unwrap();
    b.unwrap();
    cleared.unwrap();

    assert_eq!(manager.get_all().await.unwrap().len(), 1);
    // clear was submitted after the add on the same store
    assert!(other.get_all().await.unwrap().is_empty());
}
