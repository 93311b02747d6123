//! Error types for paste storage

use std::fmt;

#[derive(Debug)]
pub enum StorageError {
    /// Serialized document is larger than the configured maximum
    SizeExceeded { size: usize, max: usize },
    /// No object exists at the requested key
    NotFound(String),
    /// Key cannot be addressed literally on the backend
    InvalidKey(String),
    /// Remote backend rejected the request for infrastructure reasons
    BackendUnavailable(String),
    Http(Box<reqwest::Error>),
    Json(serde_json::Error),
    Io(Box<std::io::Error>),
}

impl StorageError {
    /// Whether the failure came from the remote backend's infrastructure
    /// rather than from the request itself.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StorageError::BackendUnavailable(_) | StorageError::Http(_)
        )
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::SizeExceeded { size, max } => write!(
                f,
                "Request body is too large ({}), must be less than {} bytes.",
                size, max
            ),
            StorageError::NotFound(key) => write!(f, "Object not found: {}", key),
            StorageError::InvalidKey(key) => write!(f, "Invalid object key: {}", key),
            StorageError::BackendUnavailable(msg) => write!(f, "Backend unavailable: {}", msg),
            StorageError::Http(err) => write!(f, "HTTP error: {}", err),
            StorageError::Json(err) => write!(f, "JSON error: {}", err),
            StorageError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Http(err) => Some(err.as_ref()),
            StorageError::Json(err) => Some(err),
            StorageError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError::Http(Box::new(err))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Json(err)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_exceeded_display() {
        let err = StorageError::SizeExceeded {
            size: 20,
            max: 15,
        };
        assert_eq!(
            format!("{}", err),
            "Request body is too large (20), must be less than 15 bytes."
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = StorageError::NotFound("prefix/abc".to_string());
        assert_eq!(format!("{}", err), "Object not found: prefix/abc");
    }

    #[test]
    fn test_transient_classification() {
        assert!(StorageError::BackendUnavailable("503".to_string()).is_transient());
        assert!(!StorageError::NotFound("abc".to_string()).is_transient());
        assert!(!StorageError::SizeExceeded { size: 2, max: 1 }.is_transient());
    }

    #[test]
    fn test_io_error_has_source() {
        let err = StorageError::from(std::io::Error::other("disk gone"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(format!("{}", err).contains("disk gone"));
    }
}
