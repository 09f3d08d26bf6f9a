//! Tests for [`DraftAutosaver`] debouncing.

use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

use mdmint::Result;
use mdmint::controller::{
    DEFAULT_DEBOUNCE, DRAFT_KEY, DraftAutosaver, DraftStore, FileDraftStore, MemoryDraftStore,
};

fn saved(store: &dyn DraftStore) -> Option<String> {
    store.get(DRAFT_KEY).unwrap()
}

/// Lets the autosaver task process what has been sent so far.
async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn saves_only_after_quiet_period() {
    let store = Arc::new(MemoryDraftStore::new());
    let drafts = DraftAutosaver::spawn(store.clone(), DEFAULT_DEBOUNCE);

    drafts.schedule("a");
    settle().await;
    tokio::time::sleep(Duration::from_millis(600)).await;
    drafts.schedule("ab");
    settle().await;
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(saved(store.as_ref()), None, "timer restarts on each edit");

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(saved(store.as_ref()).as_deref(), Some("ab"));
}

#[tokio::test(start_paused = true)]
async fn flush_writes_immediately() {
    let store = Arc::new(MemoryDraftStore::new());
    let drafts = DraftAutosaver::spawn(store.clone(), DEFAULT_DEBOUNCE);

    drafts.schedule("now");
    drafts.flush().await;
    assert_eq!(saved(store.as_ref()).as_deref(), Some("now"));
}

#[tokio::test(start_paused = true)]
async fn flush_with_nothing_pending_is_harmless() {
    let store = Arc::new(MemoryDraftStore::new());
    let drafts = DraftAutosaver::spawn(store.clone(), DEFAULT_DEBOUNCE);
    drafts.flush().await;
    assert_eq!(saved(store.as_ref()), None);
    assert!(drafts.is_running());
}

#[tokio::test(start_paused = true)]
async fn clear_cancels_pending_save() {
    let store = Arc::new(MemoryDraftStore::new());
    store.set(DRAFT_KEY, "old").unwrap();
    let drafts = DraftAutosaver::spawn(store.clone(), DEFAULT_DEBOUNCE);

    drafts.schedule("new");
    drafts.clear();
    drafts.flush().await;
    tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;
    assert_eq!(saved(store.as_ref()), None);
}

#[tokio::test(start_paused = true)]
async fn load_reads_saved_draft() {
    let store = Arc::new(MemoryDraftStore::new());
    store.set(DRAFT_KEY, "restored").unwrap();
    let drafts = DraftAutosaver::spawn(store, DEFAULT_DEBOUNCE);
    assert_eq!(drafts.load().as_deref(), Some("restored"));
}

#[tokio::test(start_paused = true)]
async fn shutdown_writes_pending_draft() {
    let store = Arc::new(MemoryDraftStore::new());
    let drafts = DraftAutosaver::spawn(store.clone(), DEFAULT_DEBOUNCE);

    drafts.schedule("last words");
    drafts.shutdown().await;
    assert_eq!(saved(store.as_ref()).as_deref(), Some("last words"));
}

/// Records the thread each write runs on.
#[derive(Default)]
struct ThreadRecordingStore {
    inner: MemoryDraftStore,
    writer: Mutex<Option<ThreadId>>,
}

impl DraftStore for ThreadRecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        *self.writer.lock().unwrap() = Some(thread::current().id());
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        *self.writer.lock().unwrap() = Some(thread::current().id());
        self.inner.remove(key)
    }
}

#[tokio::test]
async fn store_calls_run_on_blocking_pool() {
    let store = Arc::new(ThreadRecordingStore::default());
    let drafts = DraftAutosaver::spawn(store.clone(), DEFAULT_DEBOUNCE);

    drafts.schedule("off thread");
    drafts.flush().await;
    let writer = store.writer.lock().unwrap().take().unwrap();
    assert_ne!(writer, thread::current().id());
    assert_eq!(saved(store.as_ref()).as_deref(), Some("off thread"));

    drafts.clear();
    drafts.flush().await;
    let writer = store.writer.lock().unwrap().take().unwrap();
    assert_ne!(writer, thread::current().id());
    assert_eq!(saved(store.as_ref()), None);
}

#[tokio::test]
async fn file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts.json");

    let drafts = DraftAutosaver::spawn(
        Arc::new(FileDraftStore::new(&path)),
        Duration::from_millis(10),
    );
    drafts.schedule("persisted");
    drafts.shutdown().await;

    let reopened = DraftAutosaver::spawn(
        Arc::new(FileDraftStore::new(&path)),
        Duration::from_millis(10),
    );
    assert_eq!(reopened.load().as_deref(), Some("persisted"));
}
