//! remote::traits
//!
//! Transport trait and remote error type.
//!
//! # Design
//!
//! A [`Transport`] performs exactly one XML-RPC call: method name plus
//! positional arguments in, decoded value or typed failure out. It owns
//! session state (cookies) and timeouts. It never retries and never
//! authenticates on its own; that is the job of
//! [`WikiClient`](super::WikiClient).

use async_trait::async_trait;
use thiserror::Error;

use super::xmlrpc::Value;
use crate::auth::{AuthError, Site};

/// Errors from remote calls.
///
/// Messages never include credentials.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The transport reported that the session lacks valid credentials
    /// (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Login was refused, or credentials could not be obtained.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network or connection failure.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status other than 401.
    #[error("HTTP error: {status} - {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Status text or body excerpt
        message: String,
    },

    /// The server answered with an XML-RPC fault.
    #[error("remote fault {code}: {message}")]
    Fault {
        /// Fault code
        code: i64,
        /// Fault string
        message: String,
    },

    /// The call succeeded but the server reported failure (e.g. a falsy
    /// `putPage` result).
    #[error("rejected by server: {0}")]
    Rejected(String),

    /// The response could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Fault texts that mean "this session is not logged in".
const UNAUTHORIZED_MARKERS: [&str; 3] = ["unauthorized", "not authorized", "not logged in"];

impl RemoteError {
    /// Whether logging in might fix this failure.
    ///
    /// True for HTTP 401 and for faults whose text says the session is not
    /// authorized. Network and HTTP failures are never reclassified by their
    /// text.
    pub fn is_authorization_failure(&self) -> bool {
        match self {
            RemoteError::Unauthorized(_) => true,
            RemoteError::Fault { message, .. } => {
                let lower = message.to_ascii_lowercase();
                UNAUTHORIZED_MARKERS.iter().any(|m| lower.contains(m))
            }
            _ => false,
        }
    }
}

impl From<AuthError> for RemoteError {
    fn from(err: AuthError) -> Self {
        RemoteError::Authentication(err.to_string())
    }
}

/// A single-call XML-RPC transport.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a client can be shared with
/// spawned tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    /// The site credentials for this endpoint are keyed by.
    fn site(&self) -> Site;

    /// Invoke `method` with positional `params`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` for HTTP 401
    /// - `Network` / `Http` for transport failures
    /// - `Fault` when the server returns an XML-RPC fault
    /// - `Decode` for malformed responses
    async fn call(&self, method: &str, params: &[Value]) -> Result<Value, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_authorization_failure() {
        assert!(RemoteError::Unauthorized("HTTP 401".into()).is_authorization_failure());
    }

    #[test]
    fn fault_text_is_inspected() {
        let fault = |m: &str| RemoteError::Fault {
            code: -32603,
            message: m.into(),
        };
        assert!(fault("Not Authorized").is_authorization_failure());
        assert!(fault("You are not logged in").is_authorization_failure());
        assert!(fault("Unauthorized access").is_authorization_failure());
        assert!(!fault("The page is currently locked").is_authorization_failure());
    }

    #[test]
    fn transport_errors_never_reclassified() {
        assert!(
            !RemoteError::Network("proxy said: unauthorized".into()).is_authorization_failure()
        );
        assert!(!RemoteError::Http {
            status: 403,
            message: "not authorized".into()
        }
        .is_authorization_failure());
    }

    #[test]
    fn error_display() {
        assert_eq!(
            RemoteError::Http {
                status: 500,
                message: "Internal Server Error".into()
            }
            .to_string(),
            "HTTP error: 500 - Internal Server Error"
        );
        assert_eq!(
            RemoteError::Fault {
                code: 121,
                message: "page locked".into()
            }
            .to_string(),
            "remote fault 121: page locked"
        );
    }

    #[test]
    fn auth_error_converts() {
        let err: RemoteError = AuthError::Cancelled.into();
        assert!(matches!(err, RemoteError::Authentication(_)));
    }
}
