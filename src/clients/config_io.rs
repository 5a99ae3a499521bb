//! Whole-file read-modify-write of client MCP configuration
//!
//! Client config files are treated as opaque documents with one key we own:
//! `mcpServers`, a map of server name to connection descriptor. Everything
//! else in the file (editor settings, other tool config) is preserved
//! byte-for-byte in value terms across a rewrite. Consistency is last
//! writer wins; the write itself is atomic (temp file + persist) so a
//! crash never leaves a half-written config behind.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tempfile::NamedTempFile;

use super::{ClientSpec, InstallType};

const SERVERS_KEY: &str = "mcpServers";

/// A client config document with its `mcpServers` map.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    document: Value,
}

impl ClientConfig {
    /// An empty config: `{ "mcpServers": {} }`.
    pub fn empty() -> Self {
        Self {
            document: json!({ SERVERS_KEY: {} }),
        }
    }

    fn from_document(mut document: Value) -> Self {
        if !document.is_object() {
            document = json!({});
        }
        if document.get(SERVERS_KEY).map_or(true, |v| !v.is_object()) {
            document[SERVERS_KEY] = json!({});
        }
        Self { document }
    }

    fn servers_map(&self) -> &Map<String, Value> {
        // from_document guarantees the key exists and is an object
        self.document[SERVERS_KEY].as_object().unwrap()
    }

    fn servers_map_mut(&mut self) -> &mut Map<String, Value> {
        self.document[SERVERS_KEY].as_object_mut().unwrap()
    }

    /// Installed servers as (name, descriptor) pairs, sorted by name.
    pub fn servers(&self) -> Vec<(String, Value)> {
        let mut entries: Vec<_> = self
            .servers_map()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn contains_server(&self, name: &str) -> bool {
        self.servers_map().contains_key(name)
    }

    /// Insert or replace a server entry.
    pub fn insert_server(&mut self, name: &str, descriptor: Value) {
        self.servers_map_mut().insert(name.to_string(), descriptor);
    }

    /// Remove a server entry; returns false when it was not present.
    pub fn remove_server(&mut self, name: &str) -> bool {
        self.servers_map_mut().remove(name).is_some()
    }

    #[cfg(test)]
    pub(crate) fn document(&self) -> &Value {
        &self.document
    }
}

/// Read a client's config file, treating a missing file as empty.
pub fn read_config(spec: &ClientSpec, path: &Path) -> Result<ClientConfig, ClientConfigError> {
    if !spec.is_file_based() {
        return Err(ClientConfigError::NotFileBased {
            client: spec.id.to_string(),
        });
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ClientConfig::empty());
        }
        Err(source) => {
            return Err(ClientConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let document = match spec.install_type {
        InstallType::Json => {
            serde_json::from_str(&contents).map_err(|source| ClientConfigError::ParseJson {
                path: path.to_path_buf(),
                source,
            })?
        }
        InstallType::Yaml => {
            serde_yaml::from_str(&contents).map_err(|source| ClientConfigError::ParseYaml {
                path: path.to_path_buf(),
                source,
            })?
        }
        InstallType::Command => unreachable!("checked by is_file_based above"),
    };

    Ok(ClientConfig::from_document(document))
}

/// Write a client's config file atomically, creating parent directories.
pub fn write_config(
    spec: &ClientSpec,
    path: &Path,
    config: &ClientConfig,
) -> Result<(), ClientConfigError> {
    if !spec.is_file_based() {
        return Err(ClientConfigError::NotFileBased {
            client: spec.id.to_string(),
        });
    }

    let contents = match spec.install_type {
        InstallType::Json => serde_json::to_string_pretty(&config.document)
            .map_err(ClientConfigError::Serialize)?,
        InstallType::Yaml => serde_yaml::to_string(&config.document)
            .map_err(|source| ClientConfigError::SerializeYaml { source })?,
        InstallType::Command => unreachable!("checked by is_file_based above"),
    };

    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir).map_err(|source| ClientConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let mut temp_file = match parent {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(|source| ClientConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    temp_file
        .write_all(contents.as_bytes())
        .and_then(|_| temp_file.as_file_mut().sync_all())
        .map_err(|source| ClientConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file
        .persist(path)
        .map_err(|err| ClientConfigError::Write {
            path: path.to_path_buf(),
            source: err.error,
        })?;

    Ok(())
}

#[derive(Debug)]
pub enum ClientConfigError {
    /// Command-type clients have no config file to read or write.
    NotFileBased { client: String },
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    Serialize(serde_json::Error),
    SerializeYaml { source: serde_yaml::Error },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ClientConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientConfigError::NotFileBased { client } => {
                write!(f, "{} does not use a config file", client)
            }
            ClientConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ClientConfigError::ParseJson { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path.display(),
                    source
                )
            }
            ClientConfigError::ParseYaml { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path.display(),
                    source
                )
            }
            ClientConfigError::Serialize(source) => {
                write!(f, "Failed to serialize config: {}", source)
            }
            ClientConfigError::SerializeYaml { source } => {
                write!(f, "Failed to serialize config: {}", source)
            }
            ClientConfigError::Write { path, source } => {
                write!(
                    f,
                    "Failed to write config at {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ClientConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientConfigError::NotFileBased { .. } => None,
            ClientConfigError::Read { source, .. } | ClientConfigError::Write { source, .. } => {
                Some(source)
            }
            ClientConfigError::ParseJson { source, .. } | ClientConfigError::Serialize(source) => {
                Some(source)
            }
            ClientConfigError::ParseYaml { source, .. }
            | ClientConfigError::SerializeYaml { source } => Some(source),
        }
    }
}
