//! secrets
//!
//! Storage for wiki credentials.
//!
//! # Providers
//!
//! - [`FileSecretStore`]: `~/.dwiki/secrets.toml` (default)
//! - [`KeychainSecretStore`]: OS keychain (requires the `keychain` feature)
//!
//! The provider is chosen by the `[secrets] provider` config key.

mod file_store;
mod keychain_store;
mod traits;

pub use file_store::FileSecretStore;
pub use keychain_store::KeychainSecretStore;
pub use traits::{SecretError, SecretStore, SiteSecret};

/// The default secret store provider name.
pub const DEFAULT_PROVIDER: &str = "file";

/// Valid provider names, for config validation.
pub const VALID_PROVIDERS: [&str; 2] = ["file", "keychain"];

/// Create a secret store based on the provider name.
///
/// # Errors
///
/// - Unknown provider name
/// - Keychain provider without `keychain` feature enabled
/// - Initialization errors from the store
pub fn create_store(provider: &str) -> Result<Box<dyn SecretStore>, SecretError> {
    match provider {
        "file" => Ok(Box::new(FileSecretStore::new()?)),
        "keychain" => Ok(Box::new(KeychainSecretStore::new()?)),
        other => Err(SecretError::ProviderNotAvailable(format!(
            "unknown secret provider: '{}' (valid: {})",
            other,
            VALID_PROVIDERS.join(", ")
        ))),
    }
}
