//! auth::provider
//!
//! Credential providers backed by the secret store.
//!
//! Entries are laid out per site as described by [`SiteSecret`]. The
//! principal is read eagerly; the password is returned as a deferred
//! [`Secret`] and read from the store only when a login actually happens.

use std::sync::Arc;

use super::credentials::{Credentials, Secret, Site};
use super::errors::AuthError;
use crate::secrets::{SecretStore, SiteSecret};

/// Source of stored credentials for a site.
///
/// Returning `Ok(None)` means "nothing stored", which lets the caller fall
/// back to prompting.
pub trait CredentialProvider: Send + Sync {
    /// Look up credentials for a site.
    fn lookup(&self, site: &Site) -> Result<Option<Credentials>, AuthError>;
}

/// Credential provider reading from a [`SecretStore`].
pub struct StoreCredentialProvider {
    store: Arc<dyn SecretStore>,
    /// Principal to use when none is stored (from config).
    default_user: Option<String>,
}

impl StoreCredentialProvider {
    /// Create a provider over a secret store.
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            default_user: None,
        }
    }

    /// Use this principal when the store has none for the site.
    pub fn with_default_user(mut self, user: Option<String>) -> Self {
        self.default_user = user;
        self
    }
}

impl CredentialProvider for StoreCredentialProvider {
    fn lookup(&self, site: &Site) -> Result<Option<Credentials>, AuthError> {
        let principal = match self.store.site_secret(site, SiteSecret::User)? {
            Some(user) => user,
            None => match &self.default_user {
                Some(user) => user.clone(),
                None => return Ok(None),
            },
        };

        if !self.store.has_password(site)? {
            return Ok(None);
        }

        let store = Arc::clone(&self.store);
        let site = site.clone();
        let secret = Secret::deferred(move || {
            store
                .site_secret(&site, SiteSecret::Password)?
                .ok_or_else(|| AuthError::SecretUnavailable(site.to_string()))
        });

        Ok(Some(Credentials::new(principal, secret)))
    }
}

/// Provider with a fixed principal and secret, for tests and scripted use.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    principal: String,
    secret: String,
}

impl StaticCredentialProvider {
    /// Create a provider that always returns the given pair.
    pub fn new(principal: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            secret: secret.into(),
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn lookup(&self, _site: &Site) -> Result<Option<Credentials>, AuthError> {
        Ok(Some(Credentials::plain(&self.principal, &self.secret)))
    }
}

/// Provider that never has credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn lookup(&self, _site: &Site) -> Result<Option<Credentials>, AuthError> {
        Ok(None)
    }
}
