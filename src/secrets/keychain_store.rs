//! secrets::keychain_store
//!
//! OS keychain storage through the `keyring` crate, built with the
//! `keychain` feature.
//!
//! Each wiki gets its own keychain item group: the store key
//! `wiki.example.com:443.password` becomes service
//! `dwiki/wiki.example.com:443`, account `password`. Users see one entry
//! per wiki in their keychain manager instead of a flat list of keys.

#[cfg(feature = "keychain")]
use keyring::Entry;

use super::traits::{SecretError, SecretStore};

/// Service prefix for all dwiki keychain items.
const SERVICE: &str = "dwiki";

/// Keychain-based secret storage.
#[derive(Debug)]
pub struct KeychainSecretStore {
    service: String,
}

/// Split a store key into the keychain `(service, account)` pair.
///
/// The account is the text after the last `.`; keys without one are filed
/// directly under `service`.
#[cfg_attr(not(feature = "keychain"), allow(dead_code))]
fn entry_target(service: &str, key: &str) -> (String, String) {
    match key.rsplit_once('.') {
        Some((site, field)) if !site.is_empty() && !field.is_empty() => {
            (format!("{}/{}", service, site), field.to_string())
        }
        _ => (service.to_string(), key.to_string()),
    }
}

impl KeychainSecretStore {
    /// Open the keychain store.
    ///
    /// # Errors
    ///
    /// `ProviderNotAvailable` when built without the `keychain` feature.
    pub fn new() -> Result<Self, SecretError> {
        if cfg!(feature = "keychain") {
            Ok(Self::with_service(SERVICE))
        } else {
            Err(SecretError::ProviderNotAvailable(
                "keychain support not enabled (compile with --features keychain)".into(),
            ))
        }
    }

    /// Use a different service prefix, e.g. to keep test items apart.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    #[cfg(feature = "keychain")]
    fn entry(&self, key: &str) -> Result<Entry, SecretError> {
        let (service, account) = entry_target(&self.service, key);
        Entry::new(&service, &account)
            .map_err(|e| SecretError::ReadError(format!("cannot open keychain item: {}", e)))
    }
}

#[cfg(feature = "keychain")]
impl SecretStore for KeychainSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SecretError::ReadError(format!("keychain: {}", e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| SecretError::WriteError(format!("keychain: {}", e)))
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SecretError::DeleteError(format!("keychain: {}", e))),
        }
    }
}

#[cfg(not(feature = "keychain"))]
impl KeychainSecretStore {
    fn unavailable(&self) -> SecretError {
        SecretError::ProviderNotAvailable(format!("keychain ({})", self.service))
    }
}

#[cfg(not(feature = "keychain"))]
impl SecretStore for KeychainSecretStore {
    fn get(&self, _key: &str) -> Result<Option<String>, SecretError> {
        Err(self.unavailable())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), SecretError> {
        Err(self.unavailable())
    }

    fn delete(&self, _key: &str) -> Result<(), SecretError> {
        Err(self.unavailable())
    }
}
