//! Storage Backends

use std::{
    fmt::Debug,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};
use tracing::debug;

use crate::storage::{Entries, StorageError};

/// Where a [`Store`](crate::storage::Store) keeps its entries between runs.
#[async_trait]
pub trait StorageBackend: Debug + Send + Sync {
    /// Read every entry.
    async fn load(&self) -> Result<Entries, StorageError>;

    /// Replace every entry. Either all of `entries` is persisted or none is.
    async fn persist(&self, entries: &Entries) -> Result<(), StorageError>;
}

/// Keeps entries only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<Entries>,
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn load(&self) -> Result<Entries, StorageError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        *self.entries.lock().await = entries.clone();

        Ok(())
    }
}

/// A single JSON document of string keys to string values.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");

        PathBuf::from(name)
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn load(&self) -> Result<Entries, StorageError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "storage file missing, starting empty");

                return Ok(Entries::default());
            }
            Err(error) => return Err(error.into()),
        };

        serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(entries).map_err(StorageError::Encode)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let staging = self.staging_path();

        fs::write(&staging, json).await?;
        fs::rename(&staging, &self.path).await?;

        Ok(())
    }
}
