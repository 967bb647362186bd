//! Persisted digest record for generated artifacts

use crate::cache::digest::digest_file;
use crate::error::{PrebundleError, PrebundleResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// File name of the persisted record inside the cache root
pub const METADATA_FILE: &str = "_metadata.json";

/// Digest recorded for one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
}

/// On-disk shape of `_metadata.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheRecord {
    /// Milliseconds since the Unix epoch of the last write
    pub timestamp: i64,

    /// Absolute artifact path -> digest
    pub optimized: BTreeMap<String, CacheEntry>,
}

impl CacheRecord {
    /// Look up the recorded digest for a path
    pub fn hash_of(&self, path: &Path) -> Option<&str> {
        self.optimized
            .get(&cache_key(path))
            .map(|entry| entry.hash.as_str())
    }
}

/// Cache store rooted at one cache directory
///
/// Writes are serialized through an in-process lock. Two processes sharing a
/// cache root at the same time are not supported.
pub struct CacheStore {
    root: PathBuf,
    metadata_path: PathBuf,
    write_lock: Mutex<()>,
}

impl CacheStore {
    /// Create a store for the given cache root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let metadata_path = root.join(METADATA_FILE);
        Self {
            root,
            metadata_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the persisted record
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// Create the cache root if needed
    pub async fn ensure_root(&self) -> PrebundleResult<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PrebundleError::CacheRootCreate {
                path: self.root.clone(),
                source: e,
            })
    }

    /// Read the persisted record
    ///
    /// A missing or unparsable file reads as an empty record.
    pub async fn read(&self) -> CacheRecord {
        let content = match fs::read_to_string(&self.metadata_path).await {
            Ok(content) => content,
            Err(_) => return CacheRecord::default(),
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            debug!(
                "Ignoring unreadable cache record {}: {}",
                self.metadata_path.display(),
                e
            );
            CacheRecord::default()
        })
    }

    /// Check whether an artifact still matches its recorded digest
    pub async fn is_valid(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }

        let hash = match digest_file(path).await {
            Ok(hash) => hash,
            Err(e) => {
                debug!("Treating {} as stale: {}", path.display(), e);
                return false;
            }
        };

        self.read().await.hash_of(path) == Some(hash.as_str())
    }

    /// Record the current digest of an existing artifact
    pub async fn record(&self, path: &Path) -> PrebundleResult<()> {
        let _guard = self.write_lock.lock().await;

        if !path.is_file() {
            return Err(PrebundleError::ArtifactMissing(path.to_path_buf()));
        }

        let hash = digest_file(path).await?;
        let mut record = self.read().await;
        record
            .optimized
            .insert(cache_key(path), CacheEntry { hash });
        record.timestamp = Utc::now().timestamp_millis();

        self.write(&record).await?;
        debug!("Recorded {} in cache", path.display());
        Ok(())
    }

    async fn write(&self, record: &CacheRecord) -> PrebundleResult<()> {
        let content = serde_json::to_string_pretty(record)?;
        let tmp = self.root.join(format!("{}.{}.tmp", METADATA_FILE, Uuid::new_v4()));

        fs::write(&tmp, content)
            .await
            .map_err(|e| PrebundleError::io(format!("writing {}", tmp.display()), e))?;

        if let Err(e) = fs::rename(&tmp, &self.metadata_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(PrebundleError::io(
                format!("replacing {}", self.metadata_path.display()),
                e,
            ));
        }

        Ok(())
    }
}

fn cache_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
