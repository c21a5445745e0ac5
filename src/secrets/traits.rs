//! secrets::traits
//!
//! The storage interface behind `pup auth`.
//!
//! # Security
//!
//! Implementations MUST:
//! - Never log, print, or include secret values in error messages
//! - Be thread-safe (Send + Sync)

use std::path::PathBuf;

use thiserror::Error;

/// Errors from secret storage operations.
///
/// Messages carry keys and paths, never values.
#[derive(Debug, Error)]
pub enum SecretError {
    /// No secret under the given key.
    #[error("secret not found: {0}")]
    NotFound(String),

    /// Failed to read from secret storage.
    #[error("failed to read secret: {0}")]
    ReadError(String),

    /// Failed to write to secret storage.
    #[error("failed to write secret: {0}")]
    WriteError(String),

    /// Failed to delete from secret storage.
    #[error("failed to delete secret: {0}")]
    DeleteError(String),

    /// The secrets file is readable by other users.
    #[error("secrets file '{path}' has mode {mode:o}; expected 600")]
    InsecurePermissions { path: PathBuf, mode: u32 },

    /// Provider not available or not configured.
    #[error("secret provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// Key-value secret storage.
pub trait SecretStore: Send + Sync {
    /// Short provider name for status output.
    fn provider(&self) -> &'static str;

    /// `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Insert or overwrite.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Idempotent: deleting a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), SecretError>;

    fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }

    /// Like [`get`](Self::get), but a missing key is an error.
    fn require(&self, key: &str) -> Result<String, SecretError> {
        self.get(key)?
            .ok_or_else(|| SecretError::NotFound(key.to_string()))
    }
}
