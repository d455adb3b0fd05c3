//! get command - Fetch a page

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::Context;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print a page, or write it to `out`.
///
/// A page that does not exist yet prints nothing and warns.
pub fn get(ctx: &Context, raw: &str, out: Option<&Path>) -> Result<()> {
    let session = ctx.session()?;
    let rt = ctx.runtime()?;
    let page = rt.block_on(session.open(raw, None))?;

    if !page.exists {
        output::warn(format!("page '{}' does not exist yet", page.id), ctx.verbosity());
    }

    match out {
        Some(path) => {
            fs::write(path, &page.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output::status(
                format!("Wrote {} to {}", page.id, path.display()),
                ctx.verbosity(),
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(page.content.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
