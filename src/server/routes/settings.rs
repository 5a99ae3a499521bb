//! API key settings endpoints
//!
//! The key itself never leaves the server; the UI only ever sees a masked
//! preview.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::mask_key;
use crate::server::error::ApiError;
use crate::server::AppState;

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let key = state.keys.api_key()?;
    Ok(Json(json!({
        "hasApiKey": key.is_some(),
        "apiKeyPreview": key.as_deref().map(mask_key),
        "defaultClient": state.config.default_client,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetKeyRequest {
    api_key: String,
}

/// Store a new API key after checking it against the registry.
pub async fn set_api_key(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetKeyRequest>,
) -> Result<Json<Value>, ApiError> {
    let key = request.api_key.trim();
    if key.is_empty() {
        return Err(ApiError::BadRequest("API key is required".to_string()));
    }

    state.registry.validate_key(key).await?;
    state.keys.store_api_key(key)?;
    info!("API key updated");
    Ok(Json(json!({
        "success": true,
        "message": "API key saved",
    })))
}

pub async fn clear_api_key(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.keys.clear_api_key()?;
    info!("API key cleared");
    Ok(Json(json!({
        "success": true,
        "message": "API key cleared",
    })))
}
