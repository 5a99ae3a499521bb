//! The local dashboard HTTP server
//!
//! One axum router serves both the JSON API under `/api` and the embedded
//! single-page UI. The server binds to loopback only: this is a local tool
//! that edits files in the user's home directory and there is no auth on
//! the API itself.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::auth::ApiKeyStore;
use crate::clients::ClientSpec;
use crate::core::config::Config;
use crate::registry::RegistryClient;

pub mod assets;
pub mod error;
pub mod routes;

/// Default port, out of the way of common dev servers.
pub const DEFAULT_PORT: u16 = 3847;

pub struct ServeOptions {
    pub port: u16,
    pub open: bool,
}

/// Shared state behind every API handler.
pub struct AppState {
    pub registry: RegistryClient,
    pub keys: ApiKeyStore,
    pub config: Config,
    /// Base-dir override so tests can point clients at a temp tree.
    client_dirs: Option<ClientDirs>,
}

struct ClientDirs {
    home: PathBuf,
    config_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, crate::registry::RegistryError> {
        Ok(Self {
            registry: RegistryClient::new(&config.registry_url())?,
            keys: ApiKeyStore::new(),
            config: config.clone(),
            client_dirs: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests(registry: RegistryClient, home: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            registry,
            keys: ApiKeyStore::new_with_keyring(false),
            config: Config::default(),
            client_dirs: Some(ClientDirs { home, config_dir }),
        }
    }

    /// Resolve a client's config path, honoring the test override.
    pub fn client_config_path(&self, spec: &ClientSpec) -> Option<PathBuf> {
        match &self.client_dirs {
            Some(dirs) => spec.config_path_from(&dirs.home, &dirs.config_dir),
            None => spec.config_path(),
        }
    }
}

/// Assemble the full router: API routes, embedded UI, SPA fallback.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/clients", get(routes::clients::list_clients))
        .route("/api/clients/{client}", get(routes::clients::get_client))
        .route(
            "/api/clients/{client}/servers",
            get(routes::clients::list_servers).post(routes::clients::install_server),
        )
        .route(
            "/api/clients/{client}/servers/{server}",
            delete(routes::clients::uninstall_server),
        )
        .route("/api/servers/search", get(routes::servers::search))
        .route(
            "/api/servers/{*qualified_name}",
            get(routes::servers::resolve),
        )
        .route("/api/settings", get(routes::settings::get_settings))
        .route(
            "/api/settings/apikey",
            post(routes::settings::set_api_key).delete(routes::settings::clear_api_key),
        )
        .merge(assets::router())
        .fallback(assets::spa_fallback)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the dashboard until Ctrl-C.
pub async fn serve(
    options: ServeOptions,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(config)?);
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], options.port));
    let listener = TcpListener::bind(addr).await?;
    let url = format!("http://{}", listener.local_addr()?);
    info!("Forgeboard dashboard running at {url}");

    if options.open {
        open_browser(&url);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutting down");
}

/// Best-effort browser launch; the URL is always printed regardless.
fn open_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let result = Command::new("open").arg(url).spawn();
    #[cfg(target_os = "windows")]
    let result = Command::new("cmd").args(["/C", "start", "", url]).spawn();
    #[cfg(all(unix, not(target_os = "macos")))]
    let result = Command::new("xdg-open").arg(url).spawn();

    if let Err(err) = result {
        warn!("Failed to open browser: {err}");
    }
}

#[cfg(test)]
mod tests;
