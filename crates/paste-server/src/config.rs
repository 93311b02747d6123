use crate::error::{Result, ServerError};
use paste_storage::{CacheConfig, StoreConfig, CHECK_FREQUENCY, MAX_BODY_SIZE, MAX_DISK_USAGE};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Service configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreConfig,
    pub cache: CacheConfig,
    /// S3-compatible endpoint; objects are kept in memory when unset
    pub object_store_url: Option<Url>,
    pub object_store_timeout: Duration,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let bucket = var("APP_S3_BUCKET")
            .filter(|b| !b.is_empty())
            .ok_or_else(|| ServerError::Config("APP_S3_BUCKET is required".to_string()))?;

        let prefix = var("APP_S3_PREFIX").unwrap_or_default();

        let max_body_size = var("MAX_BODY_SIZE")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_BODY_SIZE);

        let cache_dir = var("CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/tmp/appcache"));

        let check_frequency = var("CACHE_CHECK_FREQUENCY")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(CHECK_FREQUENCY);

        let max_filesize = var("CACHE_MAX_FILESIZE")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(MAX_DISK_USAGE);

        let object_store_url = var("OBJECT_STORE_URL")
            .filter(|u| !u.is_empty())
            .map(|u| {
                Url::parse(&u).map_err(|e| {
                    ServerError::Config(format!("Invalid OBJECT_STORE_URL {}: {}", u, e))
                })
            })
            .transpose()?;

        let object_store_timeout = var("OBJECT_STORE_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            port,
            store: StoreConfig::new(bucket)
                .with_prefix(prefix)
                .with_max_body_size(max_body_size),
            cache: CacheConfig::new(cache_dir)
                .with_check_frequency(check_frequency)
                .with_max_filesize(max_filesize),
            object_store_url,
            object_store_timeout,
        })
    }
}
