//! Credential storage for the registry API key and per-server secrets
//!
//! The API key lives in the OS keyring under a fixed service name, with an
//! environment variable override for headless environments. Install-time
//! config values supplied by the user may contain secrets (tokens, API
//! keys for the server being installed), so they are stored in the keyring
//! as well, one JSON-encoded entry per qualified server name, and removed
//! again on uninstall.

use keyring::Entry;
use std::error::Error;

const KEYRING_SERVICE: &str = "forgeboard";
const API_KEY_ACCOUNT: &str = "registry-api-key";
const SERVER_CONFIG_PREFIX: &str = "server-config:";

/// Env var consulted before the keyring, for CI and headless use.
pub const API_KEY_ENV: &str = "FORGEBOARD_API_KEY";

pub struct ApiKeyStore {
    use_keyring: bool,
}

impl ApiKeyStore {
    pub fn new() -> Self {
        Self::new_with_keyring(true)
    }

    /// Construct a store, optionally disabling keyring access (useful for tests)
    pub fn new_with_keyring(use_keyring: bool) -> Self {
        Self { use_keyring }
    }

    /// Fetch the registry API key: env var first, then the keyring.
    ///
    /// A missing entry is `Ok(None)`; only backend failures are errors.
    pub fn api_key(&self) -> Result<Option<String>, Box<dyn Error>> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            let trimmed = key.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
        if !self.use_keyring {
            return Ok(None);
        }
        let entry = Entry::new(KEYRING_SERVICE, API_KEY_ACCOUNT)?;
        match entry.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(Box::new(err)),
        }
    }

    pub fn store_api_key(&self, key: &str) -> Result<(), Box<dyn Error>> {
        if !self.use_keyring {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, API_KEY_ACCOUNT)?;
        entry.set_password(key)?;
        Ok(())
    }

    /// Remove the stored API key. Removing a key that was never stored is
    /// not an error.
    pub fn clear_api_key(&self) -> Result<(), Box<dyn Error>> {
        if !self.use_keyring {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, API_KEY_ACCOUNT)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(Box::new(err)),
        }
    }

    /// Persist install-time config values for a server.
    pub fn store_server_config(
        &self,
        qualified_name: &str,
        config: &serde_json::Value,
    ) -> Result<(), Box<dyn Error>> {
        if !self.use_keyring {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, &server_config_account(qualified_name))?;
        entry.set_password(&serde_json::to_string(config)?)?;
        Ok(())
    }

    /// Drop any saved config for a server. Missing entries are ignored so
    /// uninstall stays idempotent.
    pub fn delete_server_config(&self, qualified_name: &str) -> Result<(), Box<dyn Error>> {
        if !self.use_keyring {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, &server_config_account(qualified_name))?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(Box::new(err)),
        }
    }
}

impl Default for ApiKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

fn server_config_account(qualified_name: &str) -> String {
    format!("{}{}", SERVER_CONFIG_PREFIX, qualified_name)
}

/// Mask an API key for display: first 8 and last 4 characters.
///
/// Short keys are fully masked rather than partially revealed.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key_long() {
        assert_eq!(mask_key("sk-1234567890abcdefghij"), "sk-12345...ghij");
    }

    #[test]
    fn test_mask_key_short_is_fully_masked() {
        assert_eq!(mask_key("short"), "*****");
        assert_eq!(mask_key("123456789012"), "************");
    }

    #[test]
    fn test_mask_key_never_reveals_middle() {
        let key = "sk-aaaaaaaaSECRETMIDDLEzzzz";
        let masked = mask_key(key);
        assert!(!masked.contains("SECRETMIDDLE"));
    }

    #[test]
    fn test_disabled_keyring_returns_none() {
        let store = ApiKeyStore::new_with_keyring(false);
        // Env override may be set by the harness; only assert when it is not.
        if std::env::var(API_KEY_ENV).is_err() {
            assert!(store.api_key().unwrap().is_none());
        }
        store.store_api_key("anything").unwrap();
        store.clear_api_key().unwrap();
    }
}
