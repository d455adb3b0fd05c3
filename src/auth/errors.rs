//! auth::errors
//!
//! Authentication error types for wiki logins.
//!
//! # Design
//!
//! Error messages MUST NOT contain passwords. Variants carry the host or the
//! principal name where that helps the user, never the secret.
//!
//! # Example
//!
//! ```
//! use dwiki::auth::AuthError;
//!
//! let err = AuthError::NoCredentials("wiki.example.com:443".to_string());
//! assert!(err.to_string().contains("wiki.example.com"));
//! ```

use thiserror::Error;

/// Errors from credential lookup and prompting.
///
/// # Security
///
/// Error messages intentionally do not include secret values.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credentials are stored and prompting is unavailable.
    #[error("no credentials for '{0}'. Run 'dwiki auth' or use an interactive terminal.")]
    NoCredentials(String),

    /// User cancelled the credential prompt.
    #[error("authentication cancelled by user")]
    Cancelled,

    /// A deferred secret could not be materialized.
    #[error("could not read secret for '{0}'")]
    SecretUnavailable(String),

    /// Error from secret storage.
    #[error("secret store error: {0}")]
    SecretStore(String),

    /// Terminal I/O failed while prompting.
    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl AuthError {
    /// Check if this error can be resolved by running `dwiki auth`.
    pub fn needs_setup(&self) -> bool {
        matches!(
            self,
            AuthError::NoCredentials(_) | AuthError::SecretUnavailable(_)
        )
    }
}

impl From<crate::secrets::SecretError> for AuthError {
    fn from(err: crate::secrets::SecretError) -> Self {
        AuthError::SecretStore(err.to_string())
    }
}

impl From<crate::ui::prompts::PromptError> for AuthError {
    fn from(err: crate::ui::prompts::PromptError) -> Self {
        match err {
            crate::ui::prompts::PromptError::Cancelled => AuthError::Cancelled,
            other => AuthError::Prompt(other.to_string()),
        }
    }
}
