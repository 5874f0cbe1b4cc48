use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Result, anyhow};
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, instrument};

/// Interface for abstracting storage of session snapshots. Works as an opaque key-value slot: the
/// text given to [SnapshotStorage::save] is what [SnapshotStorage::load] returns next time.
pub trait SnapshotStorage {
    /// Returns the last saved snapshot, or `None` if nothing was saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<String>>>;

    /// Replaces the stored snapshot.
    fn save(&self, snapshot: String) -> impl Future<Output = Result<()>>;
}

impl<T: Deref> SnapshotStorage for T
where
    T::Target: SnapshotStorage,
{
    fn load(&self) -> impl Future<Output = Result<Option<String>>> {
        self.deref().load()
    }

    fn save(&self, snapshot: String) -> impl Future<Output = Result<()>> {
        self.deref().save(snapshot)
    }
}

/// The main realization of [SnapshotStorage]. Keeps the snapshot in a single file.
pub struct FileSnapshotStorage {
    path: PathBuf,
}

impl FileSnapshotStorage {
    pub fn new(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("Snapshot path {path:?} has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStorage for FileSnapshotStorage {
    #[instrument(skip(self), fields(path = ?self.path))]
    async fn load(&self) -> Result<Option<String>> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot saved yet");
                return Ok(None);
            }
            Err(e) => Err(e)?,
        };

        file.lock_shared()?;
        let mut content = String::new();
        let result = file.read_to_string(&mut content).await;
        file.unlock_async().await?;
        result?;

        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    #[instrument(skip(self, snapshot), fields(path = ?self.path, len = snapshot.len()))]
    async fn save(&self, snapshot: String) -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        // Truncation happens under the lock so a concurrent reader never sees a half written file
        file.lock_exclusive()?;
        let result = Self::overwrite(&mut file, snapshot.as_bytes()).await;
        file.unlock_async().await?;
        result
    }
}

impl FileSnapshotStorage {
    async fn overwrite(file: &mut File, content: &[u8]) -> Result<()> {
        file.set_len(0).await?;
        file.rewind().await?;
        file.write_all(content).await?;
        file.flush().await?;
        file.sync_data().await?;
        Ok(())
    }
}

/// Keeps the snapshot in memory. Useful for tests and for running without a data directory.
#[derive(Default)]
pub struct MemorySnapshotStorage {
    snapshot: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemorySnapshotStorage {
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot.into())),
            saves: Mutex::new(0),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.snapshot.lock().ok().and_then(|v| v.clone())
    }

    /// Number of times [SnapshotStorage::save] was called.
    pub fn saves(&self) -> usize {
        self.saves.lock().map(|v| *v).unwrap_or_default()
    }
}

impl SnapshotStorage for MemorySnapshotStorage {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.current())
    }

    async fn save(&self, snapshot: String) -> Result<()> {
        *self
            .snapshot
            .lock()
            .map_err(|_| anyhow!("Snapshot lock was poisoned"))? = Some(snapshot);
        *self
            .saves
            .lock()
            .map_err(|_| anyhow!("Snapshot lock was poisoned"))? += 1;
        Ok(())
    }
}
