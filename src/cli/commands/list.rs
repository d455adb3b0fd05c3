//! list and select commands - Page listing and selection mode

use crate::cli::Context;
use crate::complete;
use crate::ui::{output, prompts};
use anyhow::{bail, Context as _, Result};

/// List all pages.
///
/// `long` adds modification times and sizes, `json` prints the detailed
/// entries as JSON. Both always fetch.
pub fn list(ctx: &Context, refresh: bool, long: bool, json: bool) -> Result<()> {
    let mut session = ctx.session()?;
    let rt = ctx.runtime()?;

    if long || json {
        let entries = rt.block_on(session.list_detailed())?;
        if json {
            let text =
                serde_json::to_string_pretty(&entries).context("Failed to encode page list")?;
            output::data(text);
        } else if !entries.is_empty() {
            output::data(output::format_page_table(&entries));
        }
        return Ok(());
    }

    let pages = rt.block_on(session.list(refresh))?;
    for id in pages.iter() {
        output::data(id);
    }
    Ok(())
}

/// Pick a page interactively and print its link.
pub fn select(ctx: &Context, refresh: bool) -> Result<()> {
    if !ctx.interactive {
        bail!("Selection needs an interactive terminal. Use 'dwiki list' instead.");
    }

    let mut session = ctx.session()?;
    let rt = ctx.runtime()?;
    let pages = rt.block_on(session.list(refresh))?;
    if pages.is_empty() {
        bail!("The wiki has no pages to select from.");
    }

    let candidates = complete::candidates(&pages);
    let index = prompts::select("Select a page:", &candidates, None, ctx.interactive)?;
    output::data(complete::selection_link(&pages[index]));
    Ok(())
}
