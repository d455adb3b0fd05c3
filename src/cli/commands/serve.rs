//! serve command - JSON-lines session for editor integrations
//!
//! Stdin carries requests, so the session never prompts: credentials must
//! be stored beforehand with `dwiki auth`.

use std::io;

use crate::cli::Context;
use crate::session::{protocol, Session};
use anyhow::{Context as _, Result};
use tracing::info;

/// Serve requests from stdin until EOF or a shutdown request.
pub fn serve(ctx: &Context) -> Result<()> {
    let mut session =
        Session::connect(&ctx.config, false).context("Failed to set up wiki session")?;
    let rt = ctx.runtime()?;

    info!(namespace = session.namespace(), "serving on stdin");
    let stdin = io::stdin();
    let stdout = io::stdout();
    protocol::serve(&rt, &mut session, stdin.lock(), stdout.lock())
        .context("Session protocol stream failed")?;
    info!("session closed");
    Ok(())
}
