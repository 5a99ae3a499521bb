//! Translation of registry entries into client config descriptors
//!
//! Installing a server never downloads anything: it resolves the server in
//! the registry, picks a connection the target client can use, and writes
//! the matching descriptor into the client's config file. Stdio servers run
//! through the registry's CLI runner so clients only ever need `npx`.

use std::fmt;

use serde_json::{json, Value};

use crate::clients::{ClientSpec, Transport};
use crate::registry::{Connection, ServerDetail};

/// Derive the installed server name from a qualified name.
///
/// Qualified names look like `@owner/name` or plain `name`; the installed
/// name is the last path segment.
pub fn server_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit('/')
        .next()
        .unwrap_or(qualified_name)
}

/// Pick the first registry connection the client supports.
pub fn choose_connection<'a>(
    server: &'a ServerDetail,
    spec: &ClientSpec,
) -> Option<&'a Connection> {
    server.connections.iter().find(|connection| {
        spec.transports.iter().any(|transport| match transport {
            Transport::Stdio => connection.is_stdio(),
            Transport::Http => connection.is_http(),
        })
    })
}

/// Validate user-supplied config values against a connection's schema.
///
/// Connections without a schema accept any values.
pub fn validate_config(connection: &Connection, config: &Value) -> Result<(), InstallError> {
    let Some(schema) = &connection.config_schema else {
        return Ok(());
    };
    let validator =
        jsonschema::validator_for(schema).map_err(|err| InstallError::InvalidSchema {
            message: err.to_string(),
        })?;
    validator
        .validate(config)
        .map_err(|err| InstallError::ConfigRejected {
            message: err.to_string(),
        })
}

/// Build the config file descriptor for an install.
pub fn format_server_entry(
    qualified_name: &str,
    connection: &Connection,
    api_key: &str,
    config: Option<&Value>,
) -> Result<Value, InstallError> {
    if connection.is_stdio() {
        let mut args = vec![
            json!("-y"),
            json!("@smithery/cli@latest"),
            json!("run"),
            json!(qualified_name),
            json!("--key"),
            json!(api_key),
        ];
        if let Some(config) = config.filter(|value| !is_empty_object(value)) {
            args.push(json!("--config"));
            args.push(json!(serde_json::to_string(config)
                .map_err(|err| InstallError::ConfigRejected {
                    message: err.to_string(),
                })?));
        }
        return Ok(json!({ "command": "npx", "args": args }));
    }

    if connection.is_http() {
        let url = connection
            .url
            .as_deref()
            .ok_or(InstallError::MissingUrl)?;
        return Ok(json!({ "type": "http", "url": url }));
    }

    Err(InstallError::UnsupportedTransport {
        kind: connection.kind.clone(),
    })
}

/// The CLI one-liner surfaced for command-type clients instead of a file edit.
pub fn install_command(qualified_name: &str, client_id: &str) -> String {
    format!(
        "npx -y @smithery/cli@latest install {} --client {}",
        qualified_name, client_id
    )
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().map(|map| map.is_empty()).unwrap_or(false)
}

#[derive(Debug)]
pub enum InstallError {
    /// No connection in the registry entry matches the client's transports.
    NoUsableConnection,
    /// An http connection arrived without a URL.
    MissingUrl,
    UnsupportedTransport { kind: String },
    InvalidSchema { message: String },
    ConfigRejected { message: String },
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallError::NoUsableConnection => {
                write!(f, "Server has no connection this client supports")
            }
            InstallError::MissingUrl => write!(f, "Registry connection is missing a URL"),
            InstallError::UnsupportedTransport { kind } => {
                write!(f, "Unsupported transport type: {}", kind)
            }
            InstallError::InvalidSchema { message } => {
                write!(f, "Server config schema is invalid: {}", message)
            }
            InstallError::ConfigRejected { message } => {
                write!(f, "Config values rejected by server schema: {}", message)
            }
        }
    }
}

impl std::error::Error for InstallError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::find_client;
    use crate::registry::ServerDetail;

    fn stdio_connection(schema: Option<Value>) -> Connection {
        Connection {
            kind: "stdio".to_string(),
            url: None,
            config_schema: schema,
        }
    }

    fn http_connection(url: &str) -> Connection {
        Connection {
            kind: "http".to_string(),
            url: Some(url.to_string()),
            config_schema: None,
        }
    }

    #[test]
    fn test_server_name_strips_scope() {
        assert_eq!(server_name("@acme/time"), "time");
        assert_eq!(server_name("plain-name"), "plain-name");
        assert_eq!(server_name("a/b/c"), "c");
    }

    #[test]
    fn test_choose_connection_respects_client_transports() {
        let server = ServerDetail {
            qualified_name: "@acme/time".to_string(),
            display_name: None,
            description: None,
            icon_url: None,
            security: None,
            connections: vec![http_connection("https://mcp.example.com"), stdio_connection(None)],
        };

        // Claude Desktop only launches stdio servers
        let claude = find_client("claude").unwrap();
        assert!(choose_connection(&server, claude).unwrap().is_stdio());

        // Cursor takes the first usable connection, which is http here
        let cursor = find_client("cursor").unwrap();
        assert!(choose_connection(&server, cursor).unwrap().is_http());
    }

    #[test]
    fn test_format_stdio_entry() {
        let entry =
            format_server_entry("@acme/time", &stdio_connection(None), "sk-key", None).unwrap();
        assert_eq!(entry["command"], "npx");
        let args: Vec<&str> = entry["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            args,
            vec!["-y", "@smithery/cli@latest", "run", "@acme/time", "--key", "sk-key"]
        );
    }

    #[test]
    fn test_format_stdio_entry_with_config() {
        let config = json!({ "timezone": "UTC" });
        let entry =
            format_server_entry("@acme/time", &stdio_connection(None), "sk-key", Some(&config))
                .unwrap();
        let args = entry["args"].as_array().unwrap();
        assert_eq!(args[args.len() - 2], "--config");
        let rendered: Value = serde_json::from_str(args[args.len() - 1].as_str().unwrap()).unwrap();
        assert_eq!(rendered, config);
    }

    #[test]
    fn test_format_http_entry() {
        let entry = format_server_entry(
            "@acme/time",
            &http_connection("https://mcp.example.com"),
            "sk-key",
            None,
        )
        .unwrap();
        assert_eq!(entry, json!({ "type": "http", "url": "https://mcp.example.com" }));
    }

    #[test]
    fn test_http_entry_without_url_fails() {
        let connection = Connection {
            kind: "http".to_string(),
            url: None,
            config_schema: None,
        };
        let err = format_server_entry("@acme/time", &connection, "sk-key", None).unwrap_err();
        assert!(matches!(err, InstallError::MissingUrl));
    }

    #[test]
    fn test_validate_config_against_schema() {
        let connection = stdio_connection(Some(json!({
            "type": "object",
            "required": ["apiKey"],
            "properties": { "apiKey": { "type": "string" } }
        })));

        assert!(validate_config(&connection, &json!({ "apiKey": "x" })).is_ok());

        let err = validate_config(&connection, &json!({})).unwrap_err();
        assert!(matches!(err, InstallError::ConfigRejected { .. }));
    }

    #[test]
    fn test_validate_config_without_schema_accepts_anything() {
        let connection = stdio_connection(None);
        assert!(validate_config(&connection, &json!({ "whatever": 1 })).is_ok());
    }

    #[test]
    fn test_install_command_mentions_client() {
        let command = install_command("@acme/time", "claude-code");
        assert!(command.contains("@acme/time"));
        assert!(command.ends_with("--client claude-code"));
    }
}
