//! secrets::file_store
//!
//! File-based secret storage.
//!
//! # Security
//!
//! - Secrets live in `secrets.toml` beside the config file
//! - File permissions are set to 0600 on Unix before any content is written
//! - All writes are atomic (write to temp file, then rename)
//! - Secrets are NEVER logged, printed, or included in error messages

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use super::traits::{SecretError, SecretStore};

/// File name used inside the config directory.
pub const SECRETS_FILE: &str = "secrets.toml";

/// TOML-backed secret store.
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    /// Store at `~/.config/pup/secrets.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, SecretError> {
        let home = dirs::home_dir()
            .ok_or_else(|| SecretError::ReadError("cannot determine home directory".into()))?;
        Ok(Self::in_dir(&home.join(".config").join("pup")))
    }

    /// Store at `<dir>/secrets.toml`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::with_path(dir.join(SECRETS_FILE))
    }

    /// Store at an exact path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_secrets(&self) -> Result<BTreeMap<String, String>, SecretError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| SecretError::ReadError(format!("cannot read secrets file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SecretError::ReadError(format!("cannot parse secrets file: {}", e)))
    }

    fn write_secrets(&self, secrets: &BTreeMap<String, String>) -> Result<(), SecretError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SecretError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(secrets)
            .map_err(|e| SecretError::WriteError(format!("cannot serialize secrets: {}", e)))?;

        let temp_path = self.path.with_extension("toml.tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| SecretError::WriteError(format!("cannot create temp file: {}", e)))?;

            #[cfg(unix)]
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| SecretError::WriteError(format!("cannot set permissions: {}", e)))?;

            file.write_all(content.as_bytes())
                .map_err(|e| SecretError::WriteError(format!("cannot write secrets: {}", e)))?;
            file.sync_all()
                .map_err(|e| SecretError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| SecretError::WriteError(format!("cannot rename temp file: {}", e)))
    }

    /// Fail if an existing secrets file is group- or world-accessible.
    #[cfg(unix)]
    pub fn check_permissions(&self) -> Result<(), SecretError> {
        if !self.path.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(&self.path)
            .map_err(|e| SecretError::ReadError(format!("cannot read file metadata: {}", e)))?;
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            return Err(SecretError::InsecurePermissions {
                path: self.path.clone(),
                mode,
            });
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn check_permissions(&self) -> Result<(), SecretError> {
        Ok(())
    }
}

impl SecretStore for FileSecretStore {
    fn provider(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        self.check_permissions()?;
        Ok(self.read_secrets()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        let mut secrets = self.read_secrets()?;
        secrets.insert(key.to_string(), value.to_string());
        self.write_secrets(&secrets)
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        let mut secrets = self.read_secrets()?;
        if secrets.remove(key).is_none() {
            return Ok(());
        }
        self.write_secrets(&secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileSecretStore) {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileSecretStore::in_dir(temp.path());
        (temp, store)
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let (_temp, store) = create_test_store();
        assert!(store.get("pup.token.datadoghq.com").expect("get").is_none());
    }

    #[test]
    fn set_get_overwrite() {
        let (_temp, store) = create_test_store();

        store.set("pup.token.datadoghq.com", "first").expect("set");
        store.set("pup.token.datadoghq.com", "second").expect("set");
        store.set("pup.token.datadoghq.eu", "eu").expect("set");

        assert_eq!(
            store.get("pup.token.datadoghq.com").expect("get"),
            Some("second".to_string())
        );
        assert_eq!(
            store.get("pup.token.datadoghq.eu").expect("get"),
            Some("eu".to_string())
        );
    }

    #[test]
    fn delete_is_idempotent() {
        let (_temp, store) = create_test_store();

        store.delete("missing").expect("delete missing");
        assert!(!store.path().exists(), "deleting nothing should not create the file");

        store.set("key", "value").expect("set");
        store.delete("key").expect("delete");
        assert!(store.get("key").expect("get").is_none());
    }

    #[test]
    fn creates_directory_if_missing() {
        let temp = TempDir::new().expect("create temp dir");
        let dir = temp.path().join("nested").join("pup");
        let store = FileSecretStore::in_dir(&dir);

        store.set("key", "value").expect("set");
        assert!(dir.join(SECRETS_FILE).exists());
    }

    #[cfg(unix)]
    #[test]
    fn permissions_0600_on_unix() {
        let (_temp, store) = create_test_store();
        store.set("key", "value").expect("set");

        let mode = fs::metadata(store.path()).expect("metadata").permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "permissions should be 0600");
        store.check_permissions().expect("check");
    }

    #[cfg(unix)]
    #[test]
    fn loose_permissions_are_refused() {
        let (_temp, store) = create_test_store();
        store.set("key", "value").expect("set");
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).expect("chmod");

        match store.get("key") {
            Err(SecretError::InsecurePermissions { mode, .. }) => assert_eq!(mode, 0o644),
            other => panic!("expected insecure permissions error, got {:?}", other),
        }
    }

    #[test]
    fn parse_errors_do_not_leak_values() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "token = [unclosed").expect("write bad toml");
        #[cfg(unix)]
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o600)).expect("chmod");

        let err = store.get("token").unwrap_err();
        assert!(err.to_string().contains("cannot parse"));
    }

    #[test]
    fn persistence_across_instances() {
        let temp = TempDir::new().expect("create temp dir");
        FileSecretStore::in_dir(temp.path())
            .set("key", "value \"quoted\" = x")
            .expect("set");

        let reopened = FileSecretStore::in_dir(temp.path());
        assert_eq!(
            reopened.get("key").expect("get"),
            Some("value \"quoted\" = x".to_string())
        );
    }
}
