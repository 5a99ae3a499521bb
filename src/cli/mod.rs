//! Command-line interface parsing and handling
//!
//! The default command starts the dashboard server; the rest are small
//! utilities for scripting and headless environments.

pub mod client_list;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::auth::{mask_key, ApiKeyStore};
use crate::cli::client_list::list_clients;
use crate::core::config::Config;
use crate::registry::RegistryClient;
use crate::server::{self, ServeOptions, DEFAULT_PORT};

#[derive(Parser)]
#[command(name = "forgeboard")]
#[command(about = "A local web dashboard for managing MCP servers across AI clients")]
#[command(
    long_about = "Forgeboard runs a local web dashboard for viewing, installing, and removing \
MCP servers across the AI client applications on this machine. It edits each \
client's own config file in place and searches the remote registry for new \
servers.\n\n\
Environment Variables:\n\
  FORGEBOARD_API_KEY       Registry API key (overrides the keyring)\n\
  FORGEBOARD_REGISTRY_URL  Registry base URL (overrides the config file)\n\
  RUST_LOG                 Log filter (defaults to forgeboard=info)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the dashboard server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Do not open the dashboard in a browser
        #[arg(long)]
        no_open: bool,
    },
    /// List known AI clients and their config file locations
    Clients,
    /// Manage the registry API key
    Apikey {
        #[command(subcommand)]
        action: ApikeyAction,
    },
}

#[derive(Subcommand)]
pub enum ApikeyAction {
    /// Validate and store an API key in the system keyring
    Set { key: String },
    /// Remove the stored API key
    Clear,
    /// Show whether a key is configured
    Status,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(concat!(env!("CARGO_PKG_NAME"), "=info")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = Config::load()?;

    match args.command.unwrap_or(Commands::Serve {
        port: DEFAULT_PORT,
        no_open: false,
    }) {
        Commands::Serve { port, no_open } => {
            let options = ServeOptions {
                port,
                open: !no_open && config.open_browser(),
            };
            server::serve(options, &config).await
        }
        Commands::Clients => {
            list_clients();
            Ok(())
        }
        Commands::Apikey { action } => run_apikey(action, &config).await,
    }
}

async fn run_apikey(action: ApikeyAction, config: &Config) -> Result<(), Box<dyn Error>> {
    let store = ApiKeyStore::new();
    match action {
        ApikeyAction::Set { key } => {
            let registry = RegistryClient::new(&config.registry_url())?;
            registry.validate_key(&key).await?;
            store.store_api_key(&key)?;
            println!("API key saved to the system keyring.");
        }
        ApikeyAction::Clear => {
            store.clear_api_key()?;
            println!("API key removed.");
        }
        ApikeyAction::Status => match store.api_key()? {
            Some(key) => println!("API key configured: {}", mask_key(&key)),
            None => println!("No API key configured."),
        },
    }
    Ok(())
}
