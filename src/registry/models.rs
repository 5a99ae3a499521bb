//! Payload types for the remote registry API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One hit from a registry search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub qualified_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub use_count: u64,
    #[serde(default)]
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub servers: Vec<SearchResult>,
}

/// A fully resolved registry server with its connection options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDetail {
    pub qualified_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Value>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// One way of reaching a server: launch it over stdio or call a hosted URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_schema: Option<Value>,
}

impl Connection {
    pub fn is_stdio(&self) -> bool {
        self.kind.eq_ignore_ascii_case("stdio")
    }

    pub fn is_http(&self) -> bool {
        // Older registry entries label hosted connections "sse"
        self.kind.eq_ignore_ascii_case("http")
            || self.kind.eq_ignore_ascii_case("streamable-http")
            || self.kind.eq_ignore_ascii_case("sse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_tolerates_missing_fields() {
        let result: SearchResult =
            serde_json::from_str(r#"{ "qualifiedName": "@acme/time" }"#).unwrap();
        assert_eq!(result.qualified_name, "@acme/time");
        assert_eq!(result.use_count, 0);
        assert!(!result.verified);
    }

    #[test]
    fn test_server_detail_parses_connections() {
        let detail: ServerDetail = serde_json::from_str(
            r#"{
                "qualifiedName": "@acme/time",
                "displayName": "Time",
                "connections": [
                    { "type": "http", "url": "https://server.example.com/mcp" },
                    { "type": "stdio", "configSchema": { "type": "object" } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(detail.connections.len(), 2);
        assert!(detail.connections[0].is_http());
        assert!(detail.connections[1].is_stdio());
        assert!(detail.connections[1].config_schema.is_some());
    }
}
