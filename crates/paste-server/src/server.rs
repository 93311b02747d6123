//! HTTP server for saved query endpoints
//!
//! Provides POST /anon, GET /anon/{uuid}, /ping and /health.

use crate::error::AppError;
use crate::types::{CreatedResponse, HealthResponse, PingResponse};
use crate::validation::validate_saved_query;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use paste_storage::{CachingFrontend, Document, ObjectStore, Storage};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

/// Shared state for the HTTP server
pub struct ServerState {
    pub storage: CachingFrontend<ObjectStore>,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(storage: CachingFrontend<ObjectStore>) -> Self {
        Self {
            storage,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/anon", post(create_query))
        .route("/anon/{uuid}", get(get_query))
        .route("/ping", get(ping))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Store a new anonymous query
async fn create_query(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<CreatedResponse>, AppError> {
    let document: Document = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {}", e)))?
    };
    validate_saved_query(&document)?;

    let uuid = state.storage.put(&document).await?;
    debug!(uuid = %uuid, "Stored query");
    Ok(Json(CreatedResponse { uuid }))
}

/// Fetch a previously stored query
async fn get_query(
    State(state): State<SharedState>,
    Path(uuid): Path<String>,
) -> Result<Json<Document>, AppError> {
    let document = state.storage.get(&uuid).await?;
    Ok(Json(document))
}

async fn ping() -> Json<PingResponse> {
    Json(PingResponse { ping: 10 })
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let cache = state.storage.cache().stats().await;
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache,
    })
}
