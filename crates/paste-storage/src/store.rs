//! Document storage on top of a remote object backend

use crate::backend::ObjectBackend;
use crate::error::{Result, StorageError};
use crate::types::{storage_key, Document, Identifier, StoreConfig};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Anything that can store a document and hand it back by identifier
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, id: &str) -> Result<Document>;

    async fn put(&self, document: &Document) -> Result<Identifier>;
}

/// Source-of-truth storage: one remote object per document
pub struct ObjectStore {
    backend: Arc<dyn ObjectBackend>,
    config: StoreConfig,
}

impl ObjectStore {
    pub fn new(backend: Arc<dyn ObjectBackend>, config: StoreConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn key(&self, id: &str) -> String {
        storage_key(&self.config.prefix, id)
    }
}

/// Only identifiers in the form `put` hands out (lowercase hyphenated UUID)
/// can name a stored object.
fn is_issued_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok_and(|uuid| uuid.hyphenated().to_string() == id)
}

#[async_trait]
impl Storage for ObjectStore {
    async fn get(&self, id: &str) -> Result<Document> {
        let key = self.key(id);
        if !is_issued_id(id) {
            debug!(id = %id, "Rejecting malformed identifier");
            return Err(StorageError::NotFound(key));
        }
        let body = self.backend.get_object(&self.config.bucket, &key).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn put(&self, document: &Document) -> Result<Identifier> {
        let body = serde_json::to_vec(document)?;
        if body.len() > self.config.max_body_size {
            return Err(StorageError::SizeExceeded {
                size: body.len(),
                max: self.config.max_body_size,
            });
        }

        let id = Uuid::new_v4().to_string();
        let key = self.key(&id);
        debug!(key = %key, size = body.len(), "Storing document");
        self.backend
            .put_object(&self.config.bucket, &key, body)
            .await?;
        Ok(id)
    }
}
