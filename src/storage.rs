use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

use crate::error::ToolError;
use crate::Result;

/// Byte storage behind the media cache. Disk today; the seam exists so a
/// different backend can hold the bytes without touching cache logic.
#[async_trait]
pub trait MediaStore: Send + Sync + fmt::Debug {
    /// Writes `data` under `name` and returns the resulting location.
    async fn write(&self, name: &str, data: &[u8]) -> Result<PathBuf>;
    /// Removes the stored bytes at `path`.
    async fn remove(&self, path: &Path) -> Result<()>;
    async fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Creates the store rooted at `root`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(ToolError::Io)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl MediaStore for DiskStore {
    async fn write(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.root.join(name);
        match fs::write(&path, data).await {
            Ok(()) => {
                debug!("Wrote {} bytes to {:?}", data.len(), path);
                Ok(path)
            }
            Err(e) => {
                error!("Failed to write {:?}: {}", path, e);
                Err(ToolError::Storage(e.to_string()))
            }
        }
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
            .await
            .map_err(|e| ToolError::Storage(e.to_string()))
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }
}
