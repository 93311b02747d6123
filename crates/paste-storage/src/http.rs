//! S3-compatible object backend over plain HTTP

use crate::backend::ObjectBackend;
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Backend talking to a path-style object endpoint:
/// `PUT {endpoint}/{bucket}/{key}` and `GET {endpoint}/{bucket}/{key}`.
pub struct HttpBackend {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpBackend {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a backend with the default 30 second timeout
    pub fn new(endpoint: Url) -> Result<Self> {
        Self::with_timeout(endpoint, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    /// URL of an object. URL parsing collapses `.` and `..` segments (even
    /// percent-encoded ones), so keys containing them are refused rather than
    /// sent somewhere other than their literal location.
    fn object_url(&self, bucket: &str, key: &str) -> Result<String> {
        if key.split('/').any(is_dot_segment) || is_dot_segment(bucket) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let base = self.endpoint.as_str().trim_end_matches('/');
        let path = key
            .split('/')
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/");
        Ok(format!("{}/{}/{}", base, urlencoding::encode(bucket), path))
    }
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

#[async_trait]
impl ObjectBackend for HttpBackend {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let url = self.object_url(bucket, key)?;
        debug!(url = %url, size = body.len(), "Uploading object");

        let response = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Object upload rejected");
            return Err(StorageError::BackendUnavailable(format!(
                "PUT {} returned status {}",
                key,
                response.status()
            )));
        }

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.object_url(bucket, key)?;
        debug!(url = %url, "Fetching object");

        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(key.to_string()));
        }
        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Object fetch failed");
            return Err(StorageError::BackendUnavailable(format!(
                "GET {} returned status {}",
                key,
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(endpoint: &str) -> HttpBackend {
        HttpBackend::new(Url::parse(endpoint).unwrap()).unwrap()
    }

    #[test]
    fn test_object_url() {
        let backend = backend("http://localhost:9000");
        assert_eq!(
            backend.object_url("bucket", "prefix/abc").unwrap(),
            "http://localhost:9000/bucket/prefix/abc"
        );
    }

    #[test]
    fn test_object_url_with_base_path() {
        let backend = backend("http://localhost:9000/storage/");
        assert_eq!(
            backend.object_url("bucket", "abc").unwrap(),
            "http://localhost:9000/storage/bucket/abc"
        );
    }

    #[test]
    fn test_object_url_encodes_segments() {
        let backend = backend("http://localhost:9000");
        assert_eq!(
            backend.object_url("bucket", "my prefix/abc").unwrap(),
            "http://localhost:9000/bucket/my%20prefix/abc"
        );
    }

    #[test]
    fn test_object_url_rejects_dot_segments() {
        let backend = backend("http://store:9000");
        for key in [
            "prefix/../../other-bucket/secret",
            "prefix/./abc",
            "..",
        ] {
            let err = backend.object_url("bucket", key).unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(ref k) if k == key));
        }
    }

    #[test]
    fn test_sent_url_keeps_key_literal() {
        let backend = backend("http://store:9000");
        // Dots inside a segment are ordinary characters
        let url = backend.object_url("bucket", "prefix/..abc/a.b").unwrap();
        let request = backend.http.get(&url).build().unwrap();
        assert_eq!(request.url().path(), "/bucket/prefix/..abc/a.b");
    }

    #[tokio::test]
    async fn test_traversal_key_never_leaves_the_process() {
        // Nothing listens here; a request would fail as transient instead
        let backend = backend("http://127.0.0.1:1");
        let err = backend
            .get_object("bucket", "prefix/../../other-bucket/secret")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transient() {
        let backend = HttpBackend::with_timeout(
            Url::parse("http://127.0.0.1:1").unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = backend.get_object("bucket", "abc").await.unwrap_err();
        assert!(err.is_transient());
    }
}
