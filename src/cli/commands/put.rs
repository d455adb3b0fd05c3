//! put command - Save a page from a file or stdin

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::cli::{Context, SaveArgs};
use crate::session::SaveRequest;
use crate::ui::output;
use anyhow::{Context as _, Result};

impl SaveArgs {
    /// Turn flags into a save request. An absent flag falls back to the
    /// configured default.
    pub fn to_request(&self) -> SaveRequest {
        SaveRequest {
            summary: self.summary.clone(),
            minor: match (self.minor, self.no_minor) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
        }
    }
}

/// Save `raw` with content from `file`, or stdin when no file is given.
pub fn put(ctx: &Context, raw: &str, file: Option<&Path>, save: &SaveArgs) -> Result<()> {
    let content = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read page content from stdin")?;
            buf
        }
    };

    let session = ctx.session()?;
    let rt = ctx.runtime()?;
    let id = rt.block_on(session.save(raw, None, &content, save.to_request()))?;

    output::status(format!("Saved {}", id), ctx.verbosity());
    Ok(())
}
