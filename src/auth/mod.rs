//! auth - wiki login credentials
//!
//! Supplies the principal/secret pair used by the RPC client's
//! login-and-retry sequence.
//!
//! # Components
//!
//! - [`Site`] - host and port credentials are keyed by
//! - [`Credentials`] / [`Secret`] - a principal and a possibly deferred secret
//! - [`CredentialProvider`] - stored credentials lookup
//! - [`StoreCredentialProvider`] - provider over a [`crate::secrets::SecretStore`]
//! - [`CredentialPrompt`] / [`TerminalPrompt`] - interactive fallback
//!
//! # Security
//!
//! Secrets MUST never appear in:
//! - logs (including --debug)
//! - JSON outputs
//! - error messages
//! - debug output
//!
//! All types in this module implement custom Debug to redact secret values.
//!
//! # Example
//!
//! ```ignore
//! use dwiki::auth::{Site, StoreCredentialProvider, CredentialProvider};
//! use dwiki::secrets;
//! use std::sync::Arc;
//!
//! let store = Arc::from(secrets::create_store(secrets::DEFAULT_PROVIDER)?);
//! let provider = StoreCredentialProvider::new(store);
//! let creds = provider.lookup(&Site::new("wiki.example.com", 443))?;
//! ```

mod credentials;
mod errors;
mod prompt;
mod provider;

pub use credentials::{Credentials, Secret, Site};
pub use errors::AuthError;
pub use prompt::{CredentialPrompt, TerminalPrompt};
pub use provider::{
    CredentialProvider, NoCredentials, StaticCredentialProvider, StoreCredentialProvider,
};
