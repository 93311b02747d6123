//! Response types for the paste server

use paste_storage::CacheStats;
use serde::{Deserialize, Serialize};

/// Body returned after storing a query
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub uuid: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub ping: u32,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_response_serialization() {
        let response = CreatedResponse {
            uuid: "abc".to_string(),
        };
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"uuid":"abc"}"#);
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            uptime_secs: 3600,
            cache: CacheStats {
                entries: 100,
                disk_size: 50_000_000,
                hits: 500,
                misses: 50,
                writes_enabled: false,
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("3600"));
        assert!(json.contains("\"writes_enabled\":false"));
    }
}
