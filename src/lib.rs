//! dwiki - A command-line and editor front-end for DokuWiki
//!
//! dwiki talks to a DokuWiki instance over its XML-RPC API. It resolves
//! short page paths against a working namespace, fetches and saves pages,
//! keeps a listing of all pages for link completion, and serves the same
//! operations to editors over a JSON-lines session.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to a session)
//! - [`session`] - Editor-facing operations and the `serve` protocol
//! - [`complete`] - Link completion over the cached page list
//! - [`remote`] - XML-RPC codec, HTTP transport and the wiki client
//! - [`core`] - Page ids, path resolution, configuration and the page cache
//! - [`auth`] - Per-site credentials and login prompts
//! - [`secrets`] - Secret storage abstraction
//! - [`ui`] - User interaction utilities
//!
//! # Behavior Guarantees
//!
//! 1. A page is reported saved only after the server accepted it
//! 2. An expired session triggers at most one login and one retry per call
//! 3. Passwords are never printed or logged

pub mod auth;
pub mod cli;
pub mod complete;
pub mod core;
pub mod remote;
pub mod secrets;
pub mod session;
pub mod ui;
