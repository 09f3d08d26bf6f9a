//! Draft persistence.
//!
//! Unconverted editor text is saved under [`DRAFT_KEY`] in a [`DraftStore`]
//! so it survives a restart. [`DraftAutosaver`] debounces the saves: each
//! edit restarts a quiet-period timer and only the last text is written
//! once the timer runs out.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{MdmintError, Result};

/// Fixed key under which the draft is stored.
pub const DRAFT_KEY: &str = "mdmint:draft";

/// Default quiet period before a draft is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// String-keyed store for drafts.
pub trait DraftStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory draft store.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Draft store backed by a JSON object on disk.
///
/// Every write replaces the whole file atomically. A missing file reads as
/// empty; a corrupt one is an error.
#[derive(Debug)]
pub struct FileDraftStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Default location: `<data dir>/mdmint/drafts.json`.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join("mdmint")
            .join("drafts.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, entries)?;
        file.write_all(b"\n")?;
        file.persist(&self.path)
            .map_err(|e| MdmintError::Io(e.error))?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        f(&mut entries);
        self.write_all(&entries)
    }
}

impl DraftStore for FileDraftStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

enum DraftCommand {
    Save(String),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Debounced background writer for the draft.
///
/// Owns one tokio task. Store calls run on the blocking pool. Dropping the
/// autosaver closes its channel; the task writes any pending draft and
/// exits. [`shutdown`](Self::shutdown) does the same and waits for it.
pub struct DraftAutosaver {
    tx: mpsc::UnboundedSender<DraftCommand>,
    store: Arc<dyn DraftStore>,
    task: JoinHandle<()>,
}

impl DraftAutosaver {
    /// Spawn an autosaver writing to `store` after `debounce` of quiet.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn DraftStore>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_autosaver(Arc::clone(&store), debounce, rx));
        Self { tx, store, task }
    }

    /// Read the saved draft, if any. Store errors are logged and read as no draft.
    pub fn load(&self) -> Option<String> {
        match self.store.get(DRAFT_KEY) {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "failed to read draft");
                None
            }
        }
    }

    /// Schedule `text` to be saved once edits go quiet.
    pub fn schedule(&self, text: impl Into<String>) {
        self.send(DraftCommand::Save(text.into()));
    }

    /// Drop any pending save and delete the stored draft.
    pub fn clear(&self) {
        self.send(DraftCommand::Clear);
    }

    /// Write any pending draft now and wait for the write.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(DraftCommand::Flush(ack_tx));
        // A closed channel means the task is gone; nothing left to flush.
        let _ = ack_rx.await;
    }

    /// Stop the background task, waiting for any pending draft to be written.
    pub async fn shutdown(self) {
        let Self { tx, task, .. } = self;
        drop(tx);
        if let Err(e) = task.await {
            warn!(error = %e, "draft autosaver task failed");
        }
    }

    /// Whether the background task is still alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    fn send(&self, command: DraftCommand) {
        if self.tx.send(command).is_err() {
            warn!("draft autosaver task has stopped");
        }
    }
}

async fn run_autosaver(
    store: Arc<dyn DraftStore>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<DraftCommand>,
) {
    let mut pending: Option<String> = None;
    loop {
        let command = if pending.is_some() {
            tokio::select! {
                command = rx.recv() => command,
                _ = tokio::time::sleep(debounce) => {
                    save(&store, pending.take()).await;
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match command {
            Some(DraftCommand::Save(text)) => pending = Some(text),
            Some(DraftCommand::Clear) => {
                pending = None;
                if let Err(e) = on_store(&store, |store| store.remove(DRAFT_KEY)).await {
                    warn!(error = %e, "failed to remove draft");
                }
            }
            Some(DraftCommand::Flush(ack)) => {
                save(&store, pending.take()).await;
                let _ = ack.send(());
            }
            None => {
                save(&store, pending.take()).await;
                break;
            }
        }
    }
}

async fn save(store: &Arc<dyn DraftStore>, draft: Option<String>) {
    let Some(text) = draft else { return };
    let chars = text.chars().count();
    match on_store(store, move |store| store.set(DRAFT_KEY, &text)).await {
        Ok(()) => debug!(chars, "saved draft"),
        Err(e) => warn!(error = %e, "failed to save draft"),
    }
}

/// Run a store call on the blocking pool; file stores do synchronous I/O.
async fn on_store<T, F>(store: &Arc<dyn DraftStore>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn DraftStore) -> Result<T> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| MdmintError::Io(std::io::Error::other(e)))?
}
