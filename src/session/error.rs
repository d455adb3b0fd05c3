//! session::error
//!
//! Error type for editor-facing operations and its user-facing kinds.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::path::PathError;
use crate::core::types::TypeError;
use crate::remote::RemoteError;
use crate::secrets::SecretError;

/// User-facing error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// A required setting is missing or invalid.
    Configuration,
    /// Login was refused or credentials are unavailable.
    Authentication,
    /// Network or HTTP failure.
    Transport,
    /// Path resolution rejected the input.
    InvalidPath,
    /// The server refused the operation.
    RemoteRejection,
    /// The server raised an application fault.
    Fault,
    /// The server's response could not be decoded.
    Decode,
    /// The editor sent a malformed request.
    Request,
}

impl ErrorKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Transport => "transport",
            ErrorKind::InvalidPath => "invalid-path",
            ErrorKind::RemoteRejection => "remote-rejection",
            ErrorKind::Fault => "fault",
            ErrorKind::Decode => "decode",
            ErrorKind::Request => "request",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("secret store unavailable: {0}")]
    Secrets(#[from] SecretError),

    #[error("invalid page id: {0}")]
    PageId(#[from] TypeError),
}

impl SessionError {
    /// The user-facing class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Config(_) | SessionError::Secrets(_) => ErrorKind::Configuration,
            SessionError::Path(_) | SessionError::PageId(_) => ErrorKind::InvalidPath,
            SessionError::Remote(err) => remote_kind(err),
        }
    }
}

/// Classify a remote error.
///
/// An authorization failure that survived the login-and-retry is reported
/// as an authentication problem.
pub fn remote_kind(err: &RemoteError) -> ErrorKind {
    if err.is_authorization_failure() {
        return ErrorKind::Authentication;
    }
    match err {
        RemoteError::Unauthorized(_) | RemoteError::Authentication(_) => ErrorKind::Authentication,
        RemoteError::Network(_) | RemoteError::Http { .. } => ErrorKind::Transport,
        RemoteError::Fault { .. } => ErrorKind::Fault,
        RemoteError::Rejected(_) => ErrorKind::RemoteRejection,
        RemoteError::Decode(_) => ErrorKind::Decode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_classification() {
        let cases = [
            (RemoteError::Unauthorized("401".into()), ErrorKind::Authentication),
            (RemoteError::Authentication("refused".into()), ErrorKind::Authentication),
            (RemoteError::Network("reset".into()), ErrorKind::Transport),
            (
                RemoteError::Http {
                    status: 502,
                    message: "Bad Gateway".into(),
                },
                ErrorKind::Transport,
            ),
            (
                RemoteError::Fault {
                    code: 1,
                    message: "not logged in".into(),
                },
                ErrorKind::Authentication,
            ),
            (
                RemoteError::Fault {
                    code: 423,
                    message: "page locked".into(),
                },
                ErrorKind::Fault,
            ),
            (RemoteError::Rejected("no".into()), ErrorKind::RemoteRejection),
            (RemoteError::Decode("junk".into()), ErrorKind::Decode),
        ];
        for (err, kind) in cases {
            assert_eq!(SessionError::from(err).kind(), kind);
        }
    }

    #[test]
    fn local_classification() {
        assert_eq!(
            SessionError::from(ConfigError::MissingEndpoint).kind(),
            ErrorKind::Configuration
        );
        let path_err = crate::core::path::resolve("Foo:bar", "ns").unwrap_err();
        let err = SessionError::from(path_err);
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        assert!(err.to_string().contains("Foo:bar"));
    }

    #[test]
    fn kind_wire_names() {
        assert_eq!(ErrorKind::InvalidPath.as_str(), "invalid-path");
        assert_eq!(
            serde_json::to_string(&ErrorKind::RemoteRejection).unwrap(),
            "\"remote-rejection\""
        );
    }
}
