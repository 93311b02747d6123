//! Storage types and configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A stored document. Storage never looks inside it.
pub type Document = serde_json::Value;

/// Identifier handed back by `put`
pub type Identifier = String;

/// Default maximum size of a serialized document (100 KiB)
pub const MAX_BODY_SIZE: usize = 100 * 1024;

/// Default disk budget for the local cache file (500 MiB)
pub const MAX_DISK_USAGE: u64 = 500 * 1024 * 1024;

/// Default number of cache writes between file size checks
pub const CHECK_FREQUENCY: u64 = 20;

/// Configuration for the remote object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub bucket: String,
    pub prefix: String,
    pub max_body_size: usize,
}

impl StoreConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: String::new(),
            max_body_size: MAX_BODY_SIZE,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }
}

/// Configuration for the bounded local cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub dir: PathBuf,
    pub check_frequency: u64,
    pub max_filesize: u64,
}

impl CacheConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            check_frequency: CHECK_FREQUENCY,
            max_filesize: MAX_DISK_USAGE,
        }
    }

    pub fn with_check_frequency(mut self, check_frequency: u64) -> Self {
        self.check_frequency = check_frequency;
        self
    }

    pub fn with_max_filesize(mut self, max_filesize: u64) -> Self {
        self.max_filesize = max_filesize;
        self
    }
}

/// Statistics about the cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub disk_size: u64,
    pub hits: u64,
    pub misses: u64,
    pub writes_enabled: bool,
}

/// Build the object key for an identifier: "{prefix}/{id}" or just "{id}"
/// when no prefix is configured. A single trailing slash on the prefix is
/// dropped before joining.
pub fn storage_key(prefix: &str, id: &str) -> String {
    if prefix.is_empty() {
        return id.to_string();
    }
    let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
    format!("{}/{}", prefix, id)
}
