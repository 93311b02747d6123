//! Paste server - anonymous saved queries
//!
//! Stores JSON query documents in an object store, with a local disk cache in
//! front of it for reads.

mod config;
mod error;
mod server;
mod types;
mod validation;

use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::server::{start_server, ServerState, SharedState};
use paste_storage::{
    BoundedLocalCache, CachingFrontend, HttpBackend, MemoryBackend, ObjectBackend, ObjectStore,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("paste_server=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting paste server...");

    let config = Config::from_env()?;
    info!("Port: {}", config.port);
    info!("Bucket: {}", config.store.bucket);
    info!("Cache dir: {:?}", config.cache.dir);
    info!(
        "Max cache size: {} MB",
        config.cache.max_filesize / (1024 * 1024)
    );

    let backend: Arc<dyn ObjectBackend> = match &config.object_store_url {
        Some(url) => {
            info!("Object store: {}", url);
            Arc::new(HttpBackend::with_timeout(
                url.clone(),
                config.object_store_timeout,
            )?)
        }
        None => {
            warn!("OBJECT_STORE_URL not set, keeping documents in memory");
            Arc::new(MemoryBackend::new())
        }
    };

    // Created once and shared by every request
    let store = ObjectStore::new(backend, config.store.clone());
    let cache = BoundedLocalCache::open(&config.cache).await?;
    let state: SharedState = Arc::new(ServerState::new(CachingFrontend::new(store, cache)));

    // Start HTTP server (blocking)
    start_server(state, config.port)
        .await
        .map_err(|e| ServerError::Config(format!("Server error: {}", e)))?;

    Ok(())
}
