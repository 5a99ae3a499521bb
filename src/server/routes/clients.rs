//! Client catalog and per-client installed-server management

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::clients::config_io::{read_config, write_config};
use crate::clients::{all_clients, find_client, ClientSpec, InstallType, Transport};
use crate::install::{
    choose_connection, format_server_entry, install_command, server_name, validate_config,
    InstallError,
};
use crate::server::error::ApiError;
use crate::server::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClientSummary {
    name: &'static str,
    label: &'static str,
    install_type: InstallType,
    transports: &'static [Transport],
    supports_oauth: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_path: Option<String>,
}

fn summarize(state: &AppState, spec: &'static ClientSpec) -> ClientSummary {
    ClientSummary {
        name: spec.id,
        label: spec.label,
        install_type: spec.install_type,
        transports: spec.transports,
        supports_oauth: spec.supports_oauth,
        config_path: state
            .client_config_path(spec)
            .map(|path| path.display().to_string()),
    }
}

fn lookup(client: &str) -> Result<&'static ClientSpec, ApiError> {
    find_client(client).ok_or_else(|| ApiError::NotFound(format!("Unknown client: {}", client)))
}

fn config_path_for(
    state: &AppState,
    spec: &'static ClientSpec,
) -> Result<std::path::PathBuf, ApiError> {
    state.client_config_path(spec).ok_or_else(|| {
        ApiError::Internal(format!("Could not resolve config path for {}", spec.id))
    })
}

pub async fn list_clients(State(state): State<Arc<AppState>>) -> Json<Value> {
    let clients: Vec<ClientSummary> = all_clients()
        .iter()
        .map(|spec| summarize(&state, spec))
        .collect();
    Json(json!({ "clients": clients }))
}

pub async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(client): Path<String>,
) -> Result<Json<ClientSummary>, ApiError> {
    let spec = lookup(&client)?;
    Ok(Json(summarize(&state, spec)))
}

/// List the servers installed for one client.
///
/// Command-type clients manage their own configuration; for those the
/// response carries an explanatory message instead of a server list.
pub async fn list_servers(
    State(state): State<Arc<AppState>>,
    Path(client): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let spec = lookup(&client)?;
    if !spec.is_file_based() {
        return Ok(Json(json!({
            "servers": [],
            "message": format!("{} manages its servers through its own CLI", spec.label),
        })));
    }

    let path = config_path_for(&state, spec)?;
    let config = read_config(spec, &path)?;
    let servers: Vec<Value> = config
        .servers()
        .into_iter()
        .map(|(name, descriptor)| json!({ "name": name, "config": descriptor }))
        .collect();
    Ok(Json(json!({ "servers": servers })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
    qualified_name: String,
    #[serde(default)]
    config: Option<Value>,
}

/// Install a registry server into a client's config file.
pub async fn install_server(
    State(state): State<Arc<AppState>>,
    Path(client): Path<String>,
    Json(request): Json<InstallRequest>,
) -> Result<Json<Value>, ApiError> {
    let spec = lookup(&client)?;
    let qualified_name = request.qualified_name.trim();
    if qualified_name.is_empty() {
        return Err(ApiError::BadRequest("qualifiedName is required".to_string()));
    }

    // Command-type clients are handled before touching the registry so the
    // answer is the same whether or not a key is configured.
    if !spec.is_file_based() {
        return Ok(Json(json!({
            "success": false,
            "message": format!("{} installs servers through its own CLI", spec.label),
            "command": install_command(qualified_name, spec.id),
        })));
    }

    let api_key = state
        .keys
        .api_key()?
        .ok_or_else(|| ApiError::Unauthorized("No API key configured".to_string()))?;

    let server = state.registry.resolve(qualified_name, &api_key).await?;
    let connection =
        choose_connection(&server, spec).ok_or(InstallError::NoUsableConnection)?;
    if let Some(config) = &request.config {
        validate_config(connection, config)?;
    }

    let descriptor =
        format_server_entry(qualified_name, connection, &api_key, request.config.as_ref())?;
    let name = server_name(qualified_name);

    // Config values may hold secrets; keep a copy in the keyring keyed by
    // the installed name so uninstall can find it again.
    if let Some(config) = request
        .config
        .as_ref()
        .filter(|value| value.as_object().is_some_and(|map| !map.is_empty()))
    {
        if let Err(err) = state.keys.store_server_config(name, config) {
            warn!("Failed to save config for {name} to the keyring: {err}");
        }
    }

    let path = config_path_for(&state, spec)?;
    let mut config = read_config(spec, &path)?;
    config.insert_server(name, descriptor);
    write_config(spec, &path, &config)?;

    info!("Installed {qualified_name} as {name} for {}", spec.id);
    Ok(Json(json!({
        "success": true,
        "message": format!("{} installed for {}", qualified_name, spec.label),
        "serverName": name,
        "restartRequired": true,
    })))
}

/// Remove an installed server from a client's config file.
pub async fn uninstall_server(
    State(state): State<Arc<AppState>>,
    Path((client, server)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let spec = lookup(&client)?;
    if !spec.is_file_based() {
        return Ok(Json(json!({
            "success": false,
            "message": format!("{} manages its servers through its own CLI", spec.label),
        })));
    }

    let path = config_path_for(&state, spec)?;
    let mut config = read_config(spec, &path)?;
    if !config.remove_server(&server) {
        return Err(ApiError::NotFound(format!(
            "{} is not installed for {}",
            server, spec.label
        )));
    }
    write_config(spec, &path, &config)?;

    if let Err(err) = state.keys.delete_server_config(&server) {
        warn!("Failed to remove saved config for {server}: {err}");
    }

    info!("Uninstalled {server} for {}", spec.id);
    Ok(Json(json!({
        "success": true,
        "message": format!("{} removed from {}", server, spec.label),
        "restartRequired": true,
    })))
}
