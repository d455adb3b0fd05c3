//! auth::credentials
//!
//! Credential value types.
//!
//! Credentials are held only for the duration of a login attempt. Nothing in
//! this module persists them; storage is the job of [`crate::secrets`].

use std::fmt;

use super::errors::AuthError;

/// The host and port a wiki endpoint lives on.
///
/// Credentials are looked up per site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Site {
    /// Host name
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl Site {
    /// Create a site.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Derive the site from an endpoint URL.
    ///
    /// Returns `None` for URLs without a host.
    pub fn from_url(url: &reqwest::Url) -> Option<Self> {
        let host = url.host_str()?;
        let port = url.port_or_known_default()?;
        Some(Self::new(host, port))
    }

    /// Secret store key prefix for this site.
    pub fn key(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

type Loader = Box<dyn FnOnce() -> Result<String, AuthError> + Send>;

/// A password, either in hand or obtainable with one more step.
///
/// Deferred secrets are read from their backing store only when a login is
/// actually attempted.
pub enum Secret {
    /// The secret value itself.
    Plain(String),
    /// A loader that yields the secret on demand.
    Deferred(Loader),
}

impl Secret {
    /// Wrap a deferred loader.
    pub fn deferred<F>(loader: F) -> Self
    where
        F: FnOnce() -> Result<String, AuthError> + Send + 'static,
    {
        Secret::Deferred(Box::new(loader))
    }

    /// Produce the secret value, running the loader if necessary.
    pub fn materialize(self) -> Result<String, AuthError> {
        match self {
            Secret::Plain(value) => Ok(value),
            Secret::Deferred(loader) => loader(),
        }
    }
}

// Never print the secret.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Secret::Plain(_) => f.write_str("Secret::Plain(<redacted>)"),
            Secret::Deferred(_) => f.write_str("Secret::Deferred(..)"),
        }
    }
}

/// A principal and its secret.
#[derive(Debug)]
pub struct Credentials {
    principal: String,
    secret: Secret,
}

impl Credentials {
    /// Create credentials from a principal and a secret.
    pub fn new(principal: impl Into<String>, secret: Secret) -> Self {
        Self {
            principal: principal.into(),
            secret,
        }
    }

    /// Create credentials with a secret already in hand.
    pub fn plain(principal: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::new(principal, Secret::Plain(secret.into()))
    }

    /// The principal (user name).
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// Split into principal and materialized secret.
    pub fn into_parts(self) -> Result<(String, String), AuthError> {
        let secret = self.secret.materialize()?;
        Ok((self.principal, secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn site_from_url_uses_default_port() {
        let url = reqwest::Url::parse("https://wiki.example.com/lib/exe/xmlrpc.php").unwrap();
        assert_eq!(Site::from_url(&url), Some(Site::new("wiki.example.com", 443)));

        let url = reqwest::Url::parse("http://localhost:8080/lib/exe/xmlrpc.php").unwrap();
        assert_eq!(Site::from_url(&url), Some(Site::new("localhost", 8080)));
    }

    #[test]
    fn site_key_and_display() {
        let site = Site::new("wiki", 80);
        assert_eq!(site.key(), "wiki:80");
        assert_eq!(site.to_string(), "wiki:80");
    }

    #[test]
    fn deferred_secret_runs_loader_only_on_materialize() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let secret = Secret::deferred(move || {
            flag.store(true, Ordering::SeqCst);
            Ok("hunter2".to_string())
        });
        assert!(!called.load(Ordering::SeqCst));
        assert_eq!(secret.materialize().unwrap(), "hunter2");
        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn debug_redacts_secret() {
        let creds = Credentials::plain("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn into_parts_propagates_loader_error() {
        let creds = Credentials::new(
            "alice",
            Secret::deferred(|| Err(AuthError::SecretUnavailable("wiki:80".into()))),
        );
        assert!(matches!(
            creds.into_parts(),
            Err(AuthError::SecretUnavailable(_))
        ));
    }
}
