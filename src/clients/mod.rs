//! Catalog of AI client applications whose MCP configuration we manage
//!
//! Each client stores its MCP servers in a well-known config file (JSON or
//! YAML) or, for command-type clients, behind its own CLI that we never
//! write to directly. The catalog is static: adding support for a new
//! client means adding one entry here.

use directories::BaseDirs;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod config_io;

/// How a client's MCP servers are installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallType {
    /// JSON config file with an `mcpServers` map
    Json,
    /// YAML config file with an `mcpServers` map
    Yaml,
    /// Managed by the client's own CLI; we only surface the command to run
    Command,
}

/// Connection transports a client can launch or reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Stdio,
    Http,
}

/// A known AI client application.
#[derive(Debug, Clone)]
pub struct ClientSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub install_type: InstallType,
    pub transports: &'static [Transport],
    pub supports_oauth: bool,
    /// Path template relative to the platform base dirs; `None` for
    /// command-type clients.
    location: Option<ConfigLocation>,
}

/// Where a client keeps its config file, relative to a platform base dir.
#[derive(Debug, Clone, Copy)]
enum ConfigLocation {
    /// Relative to the user's home directory
    Home(&'static str),
    /// Relative to the platform config dir (~/.config on Linux,
    /// ~/Library/Application Support on macOS, %APPDATA% on Windows)
    ConfigDir(&'static str),
}

const STDIO_ONLY: &[Transport] = &[Transport::Stdio];
const STDIO_AND_HTTP: &[Transport] = &[Transport::Stdio, Transport::Http];

static CLIENTS: &[ClientSpec] = &[
    ClientSpec {
        id: "claude",
        label: "Claude Desktop",
        install_type: InstallType::Json,
        transports: STDIO_ONLY,
        supports_oauth: false,
        location: Some(ConfigLocation::ConfigDir("Claude/claude_desktop_config.json")),
    },
    ClientSpec {
        id: "claude-code",
        label: "Claude Code",
        install_type: InstallType::Command,
        transports: STDIO_AND_HTTP,
        supports_oauth: true,
        location: None,
    },
    ClientSpec {
        id: "cursor",
        label: "Cursor",
        install_type: InstallType::Json,
        transports: STDIO_AND_HTTP,
        supports_oauth: false,
        location: Some(ConfigLocation::Home(".cursor/mcp.json")),
    },
    ClientSpec {
        id: "windsurf",
        label: "Windsurf",
        install_type: InstallType::Json,
        transports: STDIO_ONLY,
        supports_oauth: false,
        location: Some(ConfigLocation::Home(".codeium/windsurf/mcp_config.json")),
    },
    ClientSpec {
        id: "vscode",
        label: "VS Code",
        install_type: InstallType::Json,
        transports: STDIO_AND_HTTP,
        supports_oauth: false,
        location: Some(ConfigLocation::ConfigDir("Code/User/mcp.json")),
    },
    ClientSpec {
        id: "cline",
        label: "Cline",
        install_type: InstallType::Json,
        transports: STDIO_ONLY,
        supports_oauth: false,
        location: Some(ConfigLocation::ConfigDir(
            "Code/User/globalStorage/saoudrizwan.claude-dev/settings/cline_mcp_settings.json",
        )),
    },
    ClientSpec {
        id: "roo-cline",
        label: "Roo Code",
        install_type: InstallType::Json,
        transports: STDIO_ONLY,
        supports_oauth: false,
        location: Some(ConfigLocation::ConfigDir(
            "Code/User/globalStorage/rooveterinaryinc.roo-cline/settings/mcp_settings.json",
        )),
    },
    ClientSpec {
        id: "librechat",
        label: "LibreChat",
        install_type: InstallType::Yaml,
        transports: STDIO_AND_HTTP,
        supports_oauth: false,
        location: Some(ConfigLocation::Home("LibreChat/librechat.yaml")),
    },
];

/// All known clients, in catalog order.
pub fn all_clients() -> &'static [ClientSpec] {
    CLIENTS
}

/// Look up a client by id (case-insensitive).
pub fn find_client(id: &str) -> Option<&'static ClientSpec> {
    CLIENTS.iter().find(|c| c.id.eq_ignore_ascii_case(id))
}

impl ClientSpec {
    /// Resolve the config file path against the current platform dirs.
    ///
    /// Command-type clients have no path. `None` is also returned when the
    /// platform base directories cannot be determined.
    pub fn config_path(&self) -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        self.config_path_from(base.home_dir(), base.config_dir())
    }

    /// Resolve the config file path against explicit base directories.
    pub fn config_path_from(&self, home: &Path, config_dir: &Path) -> Option<PathBuf> {
        match self.location? {
            ConfigLocation::Home(rel) => Some(home.join(rel)),
            ConfigLocation::ConfigDir(rel) => Some(config_dir.join(rel)),
        }
    }

    pub fn is_file_based(&self) -> bool {
        self.install_type != InstallType::Command
    }
}
