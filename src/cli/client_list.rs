//! TUI-less client listing

use crate::clients::{all_clients, InstallType};

pub fn list_clients() {
    println!("Known AI clients:");
    for client in all_clients() {
        let location = match client.install_type {
            InstallType::Command => "managed by its own CLI".to_string(),
            _ => client
                .config_path()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config path unavailable".to_string()),
        };
        println!("  {:<12} {} ({})", client.id, client.label, location);
    }
}
