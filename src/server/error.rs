//! Error-to-response mapping for the HTTP API
//!
//! Every handler returns `Result<_, ApiError>`; errors become
//! `{ "error": message }` bodies with a status that tells the UI whether
//! the problem is its input (4xx), the registry (502), or this machine
//! (500). No retry policy exists on either side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::clients::config_io::ClientConfigError;
use crate::install::InstallError;
use crate::registry::RegistryError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Registry(RegistryError),
    ClientConfig(ClientConfigError),
    Install(InstallError),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Registry(RegistryError::InvalidKey) => StatusCode::UNAUTHORIZED,
            ApiError::Registry(RegistryError::ServerNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Registry(_) => StatusCode::BAD_GATEWAY,
            ApiError::ClientConfig(ClientConfigError::NotFileBased { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ClientConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Install(InstallError::InvalidSchema { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Install(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::NotFound(message)
            | ApiError::Internal(message) => message.clone(),
            ApiError::Registry(err) => err.to_string(),
            ApiError::ClientConfig(err) => err.to_string(),
            ApiError::Install(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(%status, "request failed: {message}");
        } else {
            tracing::debug!(%status, "request rejected: {message}");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError::Registry(err)
    }
}

impl From<ClientConfigError> for ApiError {
    fn from(err: ClientConfigError) -> Self {
        ApiError::ClientConfig(err)
    }
}

impl From<InstallError> for ApiError {
    fn from(err: InstallError) -> Self {
        ApiError::Install(err)
    }
}

impl From<Box<dyn std::error::Error>> for ApiError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("q".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Registry(RegistryError::InvalidKey).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Registry(RegistryError::ServerNotFound {
                qualified_name: "@a/b".into()
            })
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Install(InstallError::MissingUrl).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
