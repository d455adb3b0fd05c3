//! secrets::file_store
//!
//! File-based secret storage at `~/.dwiki/secrets.toml`.
//!
//! # Security
//!
//! - File permissions are set to 0600 on Unix before any content is written
//! - All writes are atomic (write to temp file, then rename)
//! - Values are never logged or included in error messages

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use super::traits::{SecretError, SecretStore};

/// Secrets stored as a flat TOML table of string keys.
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    /// Create a store at the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, SecretError> {
        let home = dirs::home_dir()
            .ok_or_else(|| SecretError::ReadError("cannot determine home directory".into()))?;
        Ok(Self::with_path(home.join(".dwiki").join("secrets.toml")))
    }

    /// Create a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path to the secrets file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SecretError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| SecretError::ReadError(format!("cannot read secrets file: {}", e)))?;

        // toml's own message can quote the offending line, which may hold a value.
        toml::from_str(&content)
            .map_err(|_| SecretError::ReadError("cannot parse secrets file".into()))
    }

    fn write_all(&self, secrets: &BTreeMap<String, String>) -> Result<(), SecretError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SecretError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(secrets)
            .map_err(|e| SecretError::WriteError(format!("cannot serialize secrets: {}", e)))?;

        let temp_path = self.path.with_extension("tmp");
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
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        let mut secrets = self.read_all()?;
        secrets.insert(key.to_string(), value.to_string());
        self.write_all(&secrets)
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        let mut secrets = self.read_all()?;
        if secrets.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&secrets)
    }
}
