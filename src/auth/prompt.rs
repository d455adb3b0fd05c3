//! auth::prompt
//!
//! Interactive fallback when no stored credentials exist.

use super::credentials::{Credentials, Secret, Site};
use super::errors::AuthError;
use crate::ui::prompts;

/// Asks the user for credentials.
pub trait CredentialPrompt: Send + Sync {
    /// Prompt for a principal and a masked secret for `site`.
    fn prompt(&self, site: &Site) -> Result<Credentials, AuthError>;
}

/// Terminal prompt: principal on a plain line, secret masked.
#[derive(Debug, Clone)]
pub struct TerminalPrompt {
    interactive: bool,
    default_user: Option<String>,
}

impl TerminalPrompt {
    /// Create a terminal prompt.
    ///
    /// When `interactive` is false every prompt fails with
    /// [`AuthError::NoCredentials`].
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            default_user: None,
        }
    }

    /// Offer this principal as the default answer.
    pub fn with_default_user(mut self, user: Option<String>) -> Self {
        self.default_user = user;
        self
    }
}

impl CredentialPrompt for TerminalPrompt {
    fn prompt(&self, site: &Site) -> Result<Credentials, AuthError> {
        if !self.interactive {
            return Err(AuthError::NoCredentials(site.to_string()));
        }

        let principal = prompts::input(
            &format!("User for {}", site.host),
            self.default_user.as_deref(),
            true,
        )?;
        if principal.is_empty() {
            return Err(AuthError::Cancelled);
        }

        let secret = prompts::password(&format!("Password for {}@{}", principal, site.host), true)?;

        Ok(Credentials::new(principal, Secret::Plain(secret)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_prompt_reports_missing_credentials() {
        let prompt = TerminalPrompt::new(false);
        let err = prompt.prompt(&Site::new("wiki", 443)).unwrap_err();
        assert!(matches!(err, AuthError::NoCredentials(ref s) if s == "wiki:443"));
    }
}
