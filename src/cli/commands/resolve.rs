//! resolve and link commands - Path resolution and link syntax, no network

use crate::cli::Context;
use crate::complete;
use crate::core::path;
use crate::core::types::PageId;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print the canonical id for a raw page path.
pub fn resolve(ctx: &Context, raw: &str) -> Result<()> {
    let namespace = ctx.config.namespace();
    let id = path::resolve(raw, &namespace)?;
    output::data(id);
    Ok(())
}

/// Print selection-mode link syntax for a page id.
pub fn link(id: &str) -> Result<()> {
    let id = PageId::new(id).context("Cannot link to this page")?;
    output::data(complete::selection_link(&id));
    Ok(())
}
