//! remote
//!
//! Access to a DokuWiki XML-RPC endpoint.
//!
//! # Layers
//!
//! - [`xmlrpc`]: value model, `methodCall` encoding, response decoding
//! - `traits`: the single-call [`Transport`] and [`RemoteError`]
//! - `http`: reqwest transport holding the session cookie
//! - `client`: [`WikiClient`], the typed operations with login-and-retry
//! - [`mock`]: in-memory wiki for deterministic testing
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dwiki::auth::StaticCredentialProvider;
//! use dwiki::remote::mock::MockTransport;
//! use dwiki::remote::WikiClient;
//!
//! # tokio_test::block_on(async {
//! let wiki = MockTransport::new()
//!     .with_title("Team Wiki")
//!     .require_login("alice", "secret");
//! let client = WikiClient::new(
//!     Arc::new(wiki.clone()),
//!     Arc::new(StaticCredentialProvider::new("alice", "secret")),
//! );
//!
//! // The first call is refused, the client logs in and retries once.
//! assert_eq!(client.title().await.unwrap(), "Team Wiki");
//! assert_eq!(wiki.call_count("dokuwiki.login"), 1);
//! # });
//! ```

mod client;
mod http;
pub mod mock;
mod traits;
pub mod xmlrpc;

pub use client::{PageInfo, PutOptions, RemoteMethod, WikiClient};
pub use http::HttpTransport;
pub use traits::{RemoteError, Transport};
pub use xmlrpc::Value;
