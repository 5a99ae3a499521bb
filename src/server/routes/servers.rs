//! Registry search and resolution endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::server::error::ApiError;
use crate::server::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

fn require_api_key(state: &AppState) -> Result<String, ApiError> {
    state
        .keys
        .api_key()?
        .ok_or_else(|| ApiError::Unauthorized("No API key configured".to_string()))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Search query is required".to_string()));
    }

    let api_key = require_api_key(&state)?;
    let servers = state.registry.search(query, &api_key).await?;
    Ok(Json(json!({ "servers": servers })))
}

/// Resolve one server, returning its details plus the first connection so
/// the UI can render a config form from the schema.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Path(qualified_name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let api_key = require_api_key(&state)?;
    let server = state.registry.resolve(&qualified_name, &api_key).await?;

    let connection = server.connections.first().map(|connection| {
        json!({
            "type": connection.kind,
            "configSchema": connection.config_schema,
        })
    });

    Ok(Json(json!({
        "server": {
            "qualifiedName": server.qualified_name,
            "displayName": server.display_name,
            "description": server.description,
            "iconUrl": server.icon_url,
            "security": server.security,
        },
        "connection": connection,
    })))
}
