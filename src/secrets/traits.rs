//! secrets::traits
//!
//! The credential store seam.
//!
//! # Key Layout
//!
//! Each wiki site (`host:port` of its XML-RPC endpoint) owns two entries:
//!
//! - `host:port.user` - the login name
//! - `host:port.password` - the password
//!
//! Stores see plain string keys; [`SiteSecret`] is the only place that
//! builds them. Implementations never log or echo stored values and are
//! `Send + Sync` so credential providers can share them behind an `Arc`.

use thiserror::Error;

use crate::auth::Site;

/// Errors from secret storage operations.
///
/// Messages never include stored values.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("failed to read secret: {0}")]
    ReadError(String),

    #[error("failed to write secret: {0}")]
    WriteError(String),

    #[error("failed to delete secret: {0}")]
    DeleteError(String),

    /// The configured provider cannot be used in this build or environment.
    #[error("secret provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// One half of a site's stored login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteSecret {
    User,
    Password,
}

impl SiteSecret {
    /// Entry name without the site prefix.
    pub fn field(self) -> &'static str {
        match self {
            SiteSecret::User => "user",
            SiteSecret::Password => "password",
        }
    }

    /// Store key of this entry for `site`.
    pub fn key(self, site: &Site) -> String {
        format!("{}.{}", site.key(), self.field())
    }
}

/// Key-value storage for wiki credentials.
pub trait SecretStore: Send + Sync {
    /// Get a value by key; `Ok(None)` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Set a value, overwriting any existing one.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Delete a value. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), SecretError>;

    fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }

    /// Read one entry of a site's login.
    fn site_secret(&self, site: &Site, which: SiteSecret) -> Result<Option<String>, SecretError> {
        self.get(&which.key(site))
    }

    /// Whether a password is stored for `site`.
    fn has_password(&self, site: &Site) -> Result<bool, SecretError> {
        self.exists(&SiteSecret::Password.key(site))
    }

    /// Store a verified login for `site`.
    fn store_login(&self, site: &Site, user: &str, password: &str) -> Result<(), SecretError> {
        self.set(&SiteSecret::User.key(site), user)?;
        self.set(&SiteSecret::Password.key(site), password)
    }

    /// Remove both entries of `site`, password first.
    fn forget_site(&self, site: &Site) -> Result<(), SecretError> {
        self.delete(&SiteSecret::Password.key(site))?;
        self.delete(&SiteSecret::User.key(site))
    }
}
