//! HTTP client for the remote MCP server registry
//!
//! The registry is a plain REST service: `GET /servers?q=` for search and
//! `GET /servers/{qualifiedName}` for resolution, authenticated with a
//! bearer token. There is no retry policy; failures surface to the caller
//! with the URL that failed.

use std::fmt;
use std::time::Duration;

use reqwest::{StatusCode, Url};

use crate::utils::url::construct_endpoint;

pub mod models;

pub use models::{Connection, SearchResult, ServerDetail};

use models::SearchResponse;

pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("forgeboard/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(RegistryError::HttpClient)?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    /// Search the registry for servers matching a query.
    pub async fn search(
        &self,
        query: &str,
        api_key: &str,
    ) -> Result<Vec<SearchResult>, RegistryError> {
        let url = construct_endpoint(&self.base_url, "servers");
        let response = self
            .http
            .get(&url)
            .query(&[("q", query)])
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|source| RegistryError::Fetch {
                url: url.clone(),
                source,
            })?;

        let response = check_status(response, &url)?;
        let body: SearchResponse =
            response
                .json()
                .await
                .map_err(|source| RegistryError::Fetch { url, source })?;
        Ok(body.servers)
    }

    /// Resolve a server by qualified name, including its connections.
    pub async fn resolve(
        &self,
        qualified_name: &str,
        api_key: &str,
    ) -> Result<ServerDetail, RegistryError> {
        let url = self.server_url(qualified_name)?;
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|source| RegistryError::Fetch {
                url: url.to_string(),
                source,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RegistryError::ServerNotFound {
                qualified_name: qualified_name.to_string(),
            });
        }

        let response = check_status(response, url.as_str())?;
        response
            .json()
            .await
            .map_err(|source| RegistryError::Fetch {
                url: url.to_string(),
                source,
            })
    }

    /// Check that an API key is accepted by the registry.
    ///
    /// Issues a minimal search; 401/403 means the key is bad, anything else
    /// that fails is a registry problem and must not be blamed on the key.
    pub async fn validate_key(&self, api_key: &str) -> Result<(), RegistryError> {
        match self.search("mcp", api_key).await {
            Ok(_) => Ok(()),
            Err(RegistryError::InvalidKey) => Err(RegistryError::InvalidKey),
            Err(other) => Err(other),
        }
    }

    /// Build `{base}/servers/{qualifiedName}` with the name as a single
    /// encoded path segment (qualified names contain `@` and `/`).
    fn server_url(&self, qualified_name: &str) -> Result<Url, RegistryError> {
        let base = construct_endpoint(&self.base_url, "servers");
        let mut url = Url::parse(&base).map_err(|_| RegistryError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
        })?;
        url.path_segments_mut()
            .map_err(|_| RegistryError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
            })?
            .push(qualified_name);
        Ok(url)
    }
}

fn check_status(
    response: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, RegistryError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(RegistryError::InvalidKey);
    }
    if !status.is_success() {
        return Err(RegistryError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(response)
}

#[derive(Debug)]
pub enum RegistryError {
    HttpClient(reqwest::Error),
    InvalidBaseUrl { base_url: String },
    InvalidKey,
    ServerNotFound { qualified_name: String },
    Status { url: String, status: StatusCode },
    Fetch { url: String, source: reqwest::Error },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::HttpClient(source) => {
                write!(f, "Failed to build HTTP client: {}", source)
            }
            RegistryError::InvalidBaseUrl { base_url } => {
                write!(f, "Invalid registry base URL: {}", base_url)
            }
            RegistryError::InvalidKey => write!(f, "Registry rejected the API key"),
            RegistryError::ServerNotFound { qualified_name } => {
                write!(f, "Server not found in registry: {}", qualified_name)
            }
            RegistryError::Status { url, status } => {
                write!(f, "Registry returned {} for {}", status, url)
            }
            RegistryError::Fetch { url, source } => {
                write!(f, "Failed to fetch {}: {}", url, source)
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::HttpClient(source) | RegistryError::Fetch { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url_encodes_qualified_name() {
        let client = RegistryClient::new("https://registry.example.com").unwrap();
        let url = client.server_url("@acme/time-server").unwrap();
        // The slash in the qualified name must not create a new path segment
        assert_eq!(
            url.as_str(),
            "https://registry.example.com/servers/@acme%2Ftime-server"
        );
    }

    #[test]
    fn test_invalid_base_url_is_reported() {
        let client = RegistryClient::new("not a url").unwrap();
        let err = client.server_url("@acme/time").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidBaseUrl { .. }));
    }
}
