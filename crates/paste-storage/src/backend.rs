//! Remote object backends

use crate::error::{Result, StorageError};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Raw byte storage addressed by bucket and key.
///
/// Retries and timeouts are the implementation's business; callers see one
/// attempt's outcome.
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;

    /// Fails with `StorageError::NotFound` when nothing is stored at `key`.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// In-process backend used for tests and local development
#[derive(Default)]
pub struct MemoryBackend {
    buckets: RwLock<HashMap<String, BTreeMap<String, Vec<u8>>>>,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently stored in a bucket, in sorted order
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let buckets = self.buckets.read().await;
        buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of `get_object` calls served so far
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of `put_object` calls served so far
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let mut buckets = self.buckets.write().await;
        buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), body);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let buckets = self.buckets.read().await;
        buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_put_and_get() {
        let backend = MemoryBackend::new();
        backend
            .put_object("bucket", "prefix/abc", b"{}".to_vec())
            .await
            .unwrap();

        let body = backend.get_object("bucket", "prefix/abc").await.unwrap();
        assert_eq!(body, b"{}");
        assert_eq!(backend.keys("bucket").await, vec!["prefix/abc".to_string()]);
        assert_eq!(backend.reads(), 1);
        assert_eq!(backend.writes(), 1);
    }

    #[tokio::test]
    async fn test_memory_missing_key_is_not_found() {
        let backend = MemoryBackend::new();
        backend
            .put_object("bucket", "abc", b"{}".to_vec())
            .await
            .unwrap();

        let err = backend.get_object("bucket", "xyz").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(ref key) if key == "xyz"));

        // Buckets are isolated from each other
        let err = backend.get_object("other", "abc").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_memory_keys_of_unknown_bucket() {
        let backend = MemoryBackend::new();
        assert!(backend.keys("nope").await.is_empty());
    }
}
