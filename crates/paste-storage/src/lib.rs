//! Paste storage: JSON documents in a remote object store behind a local
//! disk cache
//!
//! `ObjectStore` is the source of truth. `BoundedLocalCache` keeps copies on
//! local disk until its file reaches a size budget, after which it stops
//! taking new entries. `CachingFrontend` combines the two behind the same
//! `Storage` interface.

mod backend;
mod cache;
mod error;
mod frontend;
mod http;
mod log_store;
mod store;
mod types;

pub use backend::{MemoryBackend, ObjectBackend};
pub use cache::BoundedLocalCache;
pub use error::{Result, StorageError};
pub use frontend::CachingFrontend;
pub use http::HttpBackend;
pub use log_store::LogStore;
pub use store::{ObjectStore, Storage};
pub use types::{
    storage_key, CacheConfig, CacheStats, Document, Identifier, StoreConfig, CHECK_FREQUENCY,
    MAX_BODY_SIZE, MAX_DISK_USAGE,
};
