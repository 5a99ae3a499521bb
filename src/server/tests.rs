use std::fs;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

use crate::auth::API_KEY_ENV;
use crate::registry::RegistryClient;
use crate::server::{build_router, AppState};

// Points the registry at an unroutable address; endpoints under test must
// not reach the network.
fn test_app(dir: &TempDir) -> Router {
    let registry = RegistryClient::new("http://127.0.0.1:9").unwrap();
    let state = AppState::for_tests(
        registry,
        dir.path().join("home"),
        dir.path().join("config"),
    );
    build_router(Arc::new(state))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn no_env_key() -> bool {
    std::env::var(API_KEY_ENV).is_err()
}

#[tokio::test]
async fn test_list_clients() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(test_app(&dir), get("/api/clients")).await;

    assert_eq!(status, StatusCode::OK);
    let clients = body["clients"].as_array().unwrap();
    let names: Vec<&str> = clients
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"claude"));
    assert!(names.contains(&"cursor"));
    assert!(names.contains(&"librechat"));

    let cursor = clients.iter().find(|c| c["name"] == "cursor").unwrap();
    assert_eq!(cursor["installType"], "json");
    assert!(cursor["configPath"]
        .as_str()
        .unwrap()
        .ends_with(".cursor/mcp.json"));
}

#[tokio::test]
async fn test_get_unknown_client_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(test_app(&dir), get("/api/clients/emacs")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("emacs"));
}

#[tokio::test]
async fn test_list_servers_empty_when_no_config_file() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(test_app(&dir), get("/api/clients/cursor/servers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["servers"], json!([]));
}

#[tokio::test]
async fn test_list_servers_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let config_file = dir.path().join("home").join(".cursor").join("mcp.json");
    fs::create_dir_all(config_file.parent().unwrap()).unwrap();
    fs::write(
        &config_file,
        r#"{ "mcpServers": { "time": { "command": "npx", "args": ["-y", "mcp-time"] } } }"#,
    )
    .unwrap();

    let (status, body) = send(test_app(&dir), get("/api/clients/cursor/servers")).await;
    assert_eq!(status, StatusCode::OK);
    let servers = body["servers"].as_array().unwrap();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0]["name"], "time");
    assert_eq!(servers[0]["config"]["command"], "npx");
}

#[tokio::test]
async fn test_command_client_lists_with_message() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(test_app(&dir), get("/api/clients/claude-code/servers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["servers"], json!([]));
    assert!(body["message"].as_str().unwrap().contains("Claude Code"));
}

#[tokio::test]
async fn test_install_into_command_client_returns_cli_command() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        test_app(&dir),
        post_json(
            "/api/clients/claude-code/servers",
            json!({ "qualifiedName": "@acme/time" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    let command = body["command"].as_str().unwrap();
    assert!(command.contains("@acme/time"));
    assert!(command.contains("--client claude-code"));
}

#[tokio::test]
async fn test_install_requires_qualified_name() {
    let dir = TempDir::new().unwrap();
    let (status, _) = send(
        test_app(&dir),
        post_json("/api/clients/cursor/servers", json!({ "qualifiedName": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_install_without_api_key_is_401() {
    if !no_env_key() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        test_app(&dir),
        post_json(
            "/api/clients/cursor/servers",
            json!({ "qualifiedName": "@acme/time" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("API key"));
}

#[tokio::test]
async fn test_uninstall_missing_server_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, _) = send(
        test_app(&dir),
        delete("/api/clients/cursor/servers/nonexistent"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_uninstall_removes_server_from_config() {
    let dir = TempDir::new().unwrap();
    let config_file = dir.path().join("home").join(".cursor").join("mcp.json");
    fs::create_dir_all(config_file.parent().unwrap()).unwrap();
    fs::write(
        &config_file,
        r#"{ "theme": "dark", "mcpServers": { "time": { "command": "npx" }, "files": { "command": "uvx" } } }"#,
    )
    .unwrap();

    let (status, body) = send(test_app(&dir), delete("/api/clients/cursor/servers/time")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["restartRequired"], true);

    let rewritten: Value = serde_json::from_str(&fs::read_to_string(&config_file).unwrap()).unwrap();
    assert!(rewritten["mcpServers"]["time"].is_null());
    assert_eq!(rewritten["mcpServers"]["files"]["command"], "uvx");
    // Unrelated keys survive the rewrite
    assert_eq!(rewritten["theme"], "dark");
}

#[tokio::test]
async fn test_search_requires_query() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(test_app(&dir), get("/api/servers/search?q=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("query"));
}

#[tokio::test]
async fn test_search_without_api_key_is_401() {
    if !no_env_key() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let (status, _) = send(test_app(&dir), get("/api/servers/search?q=time")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_settings_report_no_key() {
    if !no_env_key() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let (status, body) = send(test_app(&dir), get("/api/settings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasApiKey"], false);
    assert_eq!(body["apiKeyPreview"], Value::Null);
}

#[tokio::test]
async fn test_set_api_key_rejects_blank() {
    let dir = TempDir::new().unwrap();
    let (status, _) = send(
        test_app(&dir),
        post_json("/api/settings/apikey", json!({ "apiKey": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_page_serves_index() {
    let dir = TempDir::new().unwrap();
    let response = test_app(&dir).oneshot(get("/some/page")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(std::str::from_utf8(&bytes).unwrap().contains("Forgeboard"));
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(test_app(&dir), get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}
