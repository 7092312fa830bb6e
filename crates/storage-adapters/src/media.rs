//! # Media Storage
//! hearth/crates/storage-adapters/src/media.rs
//!
//! Filesystem and in-memory implementations of `MediaStorage`. Stored
//! names are uuid-prefixed so two uploads sharing a filename never
//! collide, and the original name survives as a readable suffix.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tokio::fs;
use uuid::Uuid;

use domains::error::{PlatformError, Result};
use domains::ports::MediaStorage;

/// Strips any directory components and anything outside a conservative
/// character set. An unusable name falls back to "upload".
fn safe_name(filename: &str) -> String {
    let base = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Local-disk [`MediaStorage`].
///
/// Writes land in a scratch file first and are renamed into place, so a
/// reader either sees the whole upload or nothing.
pub struct LocalMediaStorage {
    /// Root directory for all uploads (e.g. "data/uploads").
    root: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    /// Returns the stored file name, relative to the configured root.
    async fn save_upload(&self, data: Bytes, filename: &str) -> Result<String> {
        let stored = format!("{}_{}", Uuid::now_v7(), safe_name(filename));
        let target = self.root.join(&stored);
        let scratch = self.root.join(format!("{stored}.part"));

        fs::create_dir_all(&self.root)
            .await
            .map_err(PlatformError::storage)?;
        fs::write(&scratch, &data)
            .await
            .map_err(PlatformError::storage)?;
        // Rename within one directory is atomic; no partial file is
        // ever visible under the final name.
        if let Err(e) = fs::rename(&scratch, &target).await {
            let _ = fs::remove_file(&scratch).await;
            return Err(PlatformError::storage(e));
        }

        tracing::debug!(stored = %stored, bytes = data.len(), "upload saved");
        Ok(stored)
    }
}

/// [`MediaStorage`] over a `DashMap`, for tests and seeding.
#[derive(Default)]
pub struct MemoryMediaStorage {
    files: DashMap<String, Bytes>,
}

impl MemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored under a path returned by `save_upload`.
    pub fn stored(&self, path: &str) -> Option<Bytes> {
        self.files.get(path).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl MediaStorage for MemoryMediaStorage {
    async fn save_upload(&self, data: Bytes, filename: &str) -> Result<String> {
        let stored = format!("{}_{}", Uuid::now_v7(), safe_name(filename));
        self.files.insert(stored.clone(), data);
        Ok(stored)
    }
}
