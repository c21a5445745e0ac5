//! secrets
//!
//! Storage for bearer tokens saved by `pup auth login`.
//!
//! # Architecture
//!
//! Tokens go through the [`SecretStore`] trait:
//!
//! - [`FileSecretStore`]: `secrets.toml` next to the config file (default)
//! - `KeychainSecretStore`: OS keychain (`keychain` feature)
//!
//! Tokens are keyed per site with [`token_key`], so switching `DD_SITE`
//! never sends one site's token to another.
//!
//! # Security
//!
//! - Secrets are **never** logged or included in error messages
//! - The file store uses 0600 permissions on Unix
//! - All writes are atomic (temp file + rename)
//!
//! # Example
//!
//! ```ignore
//! use pup::secrets::{create_store, token_key};
//!
//! let store = create_store("file", config.config_dir())?;
//! store.set(&token_key("datadoghq.com"), token)?;
//! ```

mod file_store;
#[cfg(feature = "keychain")]
mod keychain_store;
mod traits;

use std::path::Path;

pub use file_store::FileSecretStore;
#[cfg(feature = "keychain")]
pub use keychain_store::KeychainSecretStore;
pub use traits::{SecretError, SecretStore};

/// The default secret store provider name.
pub const DEFAULT_PROVIDER: &str = "file";

/// Secret key under which the bearer token for `site` is stored.
pub fn token_key(site: &str) -> String {
    format!("pup.token.{}", site)
}

/// Create a secret store based on the provider name.
///
/// `config_dir` places the file store next to the config file; when it is
/// `None` the default location is used.
///
/// # Errors
///
/// - Unknown provider name
/// - Keychain provider without `keychain` feature enabled
/// - Initialization errors from the store
pub fn create_store(
    provider: &str,
    config_dir: Option<&Path>,
) -> Result<Box<dyn SecretStore>, SecretError> {
    match provider {
        "file" => match config_dir {
            Some(dir) => Ok(Box::new(FileSecretStore::in_dir(dir))),
            None => Ok(Box::new(FileSecretStore::new()?)),
        },
        #[cfg(feature = "keychain")]
        "keychain" => Ok(Box::new(KeychainSecretStore::new())),
        #[cfg(not(feature = "keychain"))]
        "keychain" => Err(SecretError::ProviderNotAvailable(
            "keychain support not enabled (compile with --features keychain)".into(),
        )),
        other => Err(SecretError::ProviderNotAvailable(format!(
            "unknown secret provider: '{}' (valid: file, keychain)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_file_store_in_config_dir() {
        let temp = TempDir::new().expect("create temp dir");
        let store = create_store("file", Some(temp.path())).expect("create file store");
        assert!(store.get("nonexistent").expect("get").is_none());

        store.set("k", "v").expect("set");
        assert!(temp.path().join("secrets.toml").exists());
    }

    #[test]
    fn create_unknown_provider() {
        let result = create_store("vault", None);
        match result {
            Err(SecretError::ProviderNotAvailable(msg)) => {
                assert!(msg.contains("vault"));
            }
            Err(e) => panic!("unexpected error type: {:?}", e),
            Ok(_) => panic!("expected error"),
        }
    }

    #[cfg(not(feature = "keychain"))]
    #[test]
    fn create_keychain_without_feature() {
        match create_store("keychain", None) {
            Err(e) => {
                let msg = e.to_string();
                assert!(msg.contains("keychain"), "error should mention keychain");
                assert!(msg.contains("not enabled"), "error should mention not enabled");
            }
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn token_keys_are_per_site() {
        assert_eq!(token_key("datadoghq.com"), "pup.token.datadoghq.com");
        assert_ne!(token_key("datadoghq.com"), token_key("datadoghq.eu"));
    }
}
