//! Read-through / write-through composition of a storage and the local cache

use crate::cache::BoundedLocalCache;
use crate::error::Result;
use crate::store::Storage;
use crate::types::{Document, Identifier};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Wraps a storage object with a disk cache.
///
/// The wrapped storage is the source of truth: its errors always reach the
/// caller, while cache failures are logged and otherwise ignored.
pub struct CachingFrontend<S> {
    source: S,
    cache: BoundedLocalCache,
}

impl<S: Storage> CachingFrontend<S> {
    pub fn new(source: S, cache: BoundedLocalCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &BoundedLocalCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    async fn populate(&self, id: &str, document: &Document) {
        if let Err(e) = self.cache.set(id, document).await {
            warn!(id = %id, error = %e, "Failed to cache document");
        }
    }
}

#[async_trait]
impl<S: Storage> Storage for CachingFrontend<S> {
    async fn get(&self, id: &str) -> Result<Document> {
        if let Some(cached) = self.cache.get(id).await {
            debug!(id = %id, "Cache hit");
            return Ok(cached);
        }

        debug!(id = %id, "Cache miss, retrieving from source");
        let document = self.source.get(id).await?;
        self.populate(id, &document).await;
        Ok(document)
    }

    async fn put(&self, document: &Document) -> Result<Identifier> {
        let id = self.source.put(document).await?;
        self.populate(&id, document).await;
        Ok(id)
    }
}
