//! Error types for the paste server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paste_storage::StorageError;
use serde_json::json;
use std::fmt;

/// Startup failures
#[derive(Debug)]
pub enum ServerError {
    Storage(StorageError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Storage(err) => write!(f, "Storage error: {}", err),
            ServerError::Io(err) => write!(f, "IO error: {}", err),
            ServerError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Storage(err) => Some(err),
            ServerError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<StorageError> for ServerError {
    fn from(err: StorageError) -> Self {
        ServerError::Storage(err)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ServerError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ServerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Request error type that converts to HTTP responses
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
    Internal(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeExceeded { .. } => AppError::BadRequest(err.to_string()),
            StorageError::NotFound(_) => AppError::NotFound("Query not found".to_string()),
            err if err.is_transient() => AppError::Unavailable(err.to_string()),
            err => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => {
                tracing::error!(error = %msg, "Object store unavailable");
                (
                    StatusCode::BAD_GATEWAY,
                    "Storage backend unavailable".into(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ServerError::Config("APP_S3_BUCKET is required".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: APP_S3_BUCKET is required"
        );
    }

    #[test]
    fn test_size_exceeded_is_bad_request() {
        let err = AppError::from(StorageError::SizeExceeded { size: 20, max: 10 });
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("too large")));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::from(StorageError::NotFound("prefix/abc".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_backend_unavailable_maps_to_502() {
        let err = AppError::from(StorageError::BackendUnavailable("503".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_io_failure_is_internal() {
        let err = AppError::from(StorageError::from(std::io::Error::other("disk")));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
