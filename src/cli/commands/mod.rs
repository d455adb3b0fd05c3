//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Builds a session and calls its operations
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Commands that talk to the wiki are async underneath. Each handler
//! creates a runtime and blocks on its work, so the CLI stays synchronous.

mod auth;
mod browse;
mod completion;
mod config_cmd;
mod edit;
mod get;
mod list;
mod put;
mod resolve;
mod serve;
mod status;

pub use auth::auth;
pub use browse::{browse, page_url};
pub use completion::completion;
pub use config_cmd::config;
pub use edit::edit;
pub use get::get;
pub use list::{list, select};
pub use put::put;
pub use resolve::{link, resolve};
pub use serve::serve;
pub use status::{status, title};

use super::args::Command;
use super::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Resolve { path } => resolve(ctx, &path),
        Command::Get { path, output } => get(ctx, &path, output.as_deref()),
        Command::Put { path, file, save } => put(ctx, &path, file.as_deref(), &save),
        Command::Edit { path, save } => edit(ctx, &path, &save),
        Command::List {
            refresh,
            long,
            json,
        } => list(ctx, refresh, long, json),
        Command::Select { refresh } => select(ctx, refresh),
        Command::Link { id } => link(&id),
        Command::Title => title(ctx),
        Command::Status => status(ctx),
        Command::Browse { path } => browse(ctx, path.as_deref()),
        Command::Auth {
            password_stdin,
            status,
            logout,
        } => auth(ctx, password_stdin, status, logout),
        Command::Config { action } => config(&action, ctx.verbosity()),
        Command::Completion { shell } => completion(shell),
        Command::Serve => serve(ctx),
    }
}
