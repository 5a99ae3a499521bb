//! Forgeboard is a local web dashboard for managing MCP servers across the
//! AI client applications installed on a machine.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`clients`] knows which AI clients exist, where each keeps its MCP
//!   config file, and how to rewrite that file safely.
//! - [`registry`] is the HTTP client for the remote server registry
//!   (search, resolution, key validation).
//! - [`install`] turns a registry entry into the descriptor written into a
//!   client's config file.
//! - [`auth`] stores the registry API key and per-server secrets in the
//!   system keyring.
//! - [`server`] is the axum HTTP server: the JSON API plus the embedded
//!   single-page dashboard UI.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`server::serve`]
//! for the dashboard.

pub mod auth;
pub mod cli;
pub mod clients;
pub mod core;
pub mod install;
pub mod registry;
pub mod server;
pub mod utils;
