//! Storage abstraction trait

use async_trait::async_trait;
use std::time::SystemTime;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A file visible to the backend, with its on-disk modification time.
/// Consumed by the orphan sweep.
#[derive(Debug, Clone)]
pub struct StorageEntry {
    pub key: String,
    pub modified: SystemTime,
}

/// Storage abstraction trait
///
/// Uploaded originals are write-once: they are read on every transform
/// request and deleted by cleanup, never mutated in place.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` under `storage_key` and return the public URL.
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Read the full contents of a stored file.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a stored file. Deleting a key that no longer exists is Ok -
    /// cleanup paths race each other by design.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Whether a key currently resolves to an on-disk object.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Every file the backend currently holds, with modification times.
    async fn list_entries(&self) -> StorageResult<Vec<StorageEntry>>;

    /// Public URL for a stored key.
    fn public_url(&self, storage_key: &str) -> String;
}
