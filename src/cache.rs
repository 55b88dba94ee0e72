//! Media cache: fetches remote media, stores bytes through a `MediaStore`,
//! and keeps a persistent metadata index with age-based eviction.

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::error::ToolError;
use crate::metadata::MediaMetadata;
use crate::network::NetworkClient;
use crate::retry::{with_retry, RetryPolicy};
use crate::storage::{DiskStore, MediaStore};
use crate::Result;

const INDEX_FILE: &str = "index.json";

pub struct MediaCache {
    store: Arc<dyn MediaStore>,
    network: NetworkClient,
    retry: RetryPolicy,
    index_path: PathBuf,
    // Records in insertion order; the lock spans every mutation together
    // with its index flush, so concurrent fetches and cleanups never observe
    // a half-written record.
    state: Arc<RwLock<Vec<MediaMetadata>>>,
}

impl MediaCache {
    /// Opens the cache under `config.cache.root_dir`, reloading any index a
    /// previous run left behind.
    pub fn new(config: &Config) -> Result<Self> {
        let root = &config.cache.root_dir;
        info!("Initializing media cache at {:?}", root);
        let store = DiskStore::new(root)?;
        let index_path = store.root().join(INDEX_FILE);
        let records = Self::load_index(&index_path);

        Ok(Self {
            store: Arc::new(store),
            network: NetworkClient::new(config.fetch_timeout()),
            retry: config.retry_policy(),
            index_path,
            state: Arc::new(RwLock::new(records)),
        })
    }

    fn load_index(path: &PathBuf) -> Vec<MediaMetadata> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str::<Vec<MediaMetadata>>(&content) {
            Ok(records) => {
                debug!("Loaded {} records from {:?}", records.len(), path);
                records
            }
            Err(e) => {
                warn!("Discarding unreadable index {:?}: {}", path, e);
                Vec::new()
            }
        }
    }

    async fn persist_index(&self, records: &[MediaMetadata]) -> Result<()> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| ToolError::Storage(e.to_string()))?;
        tokio::fs::write(&self.index_path, json)
            .await
            .map_err(|e| ToolError::Storage(e.to_string()))
    }

    /// Downloads `url` (with retry on transient failures), caches the bytes,
    /// and returns the new record.
    pub async fn fetch_media_from_url(
        &self,
        url: &str,
        session_id: Option<&str>,
    ) -> Result<MediaMetadata> {
        let parsed = Url::parse(url)
            .map_err(|e| ToolError::InvalidInput(format!("invalid URL {:?}: {}", url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ToolError::InvalidInput(format!(
                "unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }

        let fetched = with_retry(&self.retry, || self.network.fetch(url)).await?;
        self.insert_bytes(url, session_id, fetched.content_type.as_deref(), &fetched.bytes)
            .await
    }

    /// Records bytes the caller already holds. `fetch_media_from_url` is the
    /// network step plus this.
    pub async fn insert_bytes(
        &self,
        source_url: &str,
        session_id: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<MediaMetadata> {
        let media_id = Uuid::new_v4().to_string();
        let file_name = format!("{}.{}", media_id, extension_for(content_type, source_url));

        // Bytes land on disk before the record becomes visible.
        let local_path = self.store.write(&file_name, bytes).await?;

        let metadata = MediaMetadata::new(media_id, source_url.to_string(), local_path)
            .with_session(session_id.map(str::to_string))
            .with_content_type(content_type.map(str::to_string))
            .with_size(bytes.len() as u64);

        let mut records = self.state.write().await;
        records.push(metadata.clone());
        if let Err(e) = self.persist_index(&records).await {
            // Roll back so memory and index.json stay in agreement.
            records.pop();
            if let Err(re) = self.store.remove(&metadata.local_path).await {
                warn!("Failed to remove {:?}: {}", metadata.local_path, re);
            }
            return Err(e);
        }
        info!(
            "Cached {} bytes from {} as {}",
            metadata.size_bytes, source_url, metadata.media_id
        );
        Ok(metadata)
    }

    pub async fn get_media_metadata(&self, media_id: &str) -> Result<MediaMetadata> {
        let records = self.state.read().await;
        records
            .iter()
            .find(|r| r.media_id == media_id)
            .cloned()
            .ok_or_else(|| ToolError::NotFound(media_id.to_string()))
    }

    /// All records in insertion order, optionally narrowed to one session.
    pub async fn list_media(&self, session_id: Option<&str>) -> Vec<MediaMetadata> {
        let records = self.state.read().await;
        records
            .iter()
            .filter(|r| match session_id {
                Some(session) => r.session_id.as_deref() == Some(session),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Drops a single record and its file.
    pub async fn remove_media(&self, media_id: &str) -> Result<()> {
        let mut records = self.state.write().await;
        let position = records
            .iter()
            .position(|r| r.media_id == media_id)
            .ok_or_else(|| ToolError::NotFound(media_id.to_string()))?;
        let record = records.remove(position);
        if let Err(e) = self.store.remove(&record.local_path).await {
            warn!("Failed to remove {:?}: {}", record.local_path, e);
        }
        self.persist_index(&records).await?;
        info!("Removed media {}", media_id);
        Ok(())
    }

    /// Deletes every record older than `max_age_hours`, file included, and
    /// returns how many were evicted. Running it again right away is a no-op.
    pub async fn cleanup_old_media(&self, max_age_hours: u64) -> Result<usize> {
        let mut records = self.state.write().await;
        let now = Utc::now();

        let (expired, kept): (Vec<_>, Vec<_>) = records
            .drain(..)
            .partition(|r| r.is_expired(now, max_age_hours));
        *records = kept;

        for record in &expired {
            if let Err(e) = self.store.remove(&record.local_path).await {
                warn!("Failed to remove {:?}: {}", record.local_path, e);
            }
            debug!("Evicted {} (age {})", record.media_id, record.age(now));
        }

        if !expired.is_empty() {
            self.persist_index(&records).await?;
        }
        info!(
            "Cleanup removed {} records, {} remain",
            expired.len(),
            records.len()
        );
        Ok(expired.len())
    }
}

/// Picks a file extension from the Content-Type, falling back to whatever
/// the URL path carries, then to "bin".
fn extension_for(content_type: Option<&str>, url: &str) -> String {
    let known = content_type.and_then(|ct| match ct {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "application/pdf" => Some("pdf"),
        "audio/mpeg" => Some("mp3"),
        "audio/ogg" => Some("ogg"),
        "audio/wav" | "audio/x-wav" => Some("wav"),
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        _ => None,
    });
    if let Some(ext) = known {
        return ext.to_string();
    }

    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path()
                .rsplit('/')
                .next()
                .and_then(|name| name.rsplit_once('.'))
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        })
        .unwrap_or_else(|| "bin".to_string())
}
