//! edit command - Round-trip a page through $EDITOR
//!
//! # Failure handling
//!
//! The page is only reported saved after the server accepted it. When the
//! save fails, the temporary file is kept and its path is printed.

use std::fs;
use std::process::Command;

use crate::cli::{Context, SaveArgs};
use crate::ui::output;
use anyhow::{bail, Context as _, Result};
use tracing::debug;

/// Editor command line from `$VISUAL`, then `$EDITOR`, then `vi`.
fn editor_command() -> Vec<String> {
    editor_from(std::env::var("VISUAL").ok(), std::env::var("EDITOR").ok())
}

fn editor_from(visual: Option<String>, editor: Option<String>) -> Vec<String> {
    let set = |v: &String| !v.trim().is_empty();
    let raw = visual
        .filter(set)
        .or_else(|| editor.filter(set))
        .unwrap_or_else(|| "vi".to_string());
    raw.split_whitespace().map(str::to_string).collect()
}

/// Edit a page interactively.
pub fn edit(ctx: &Context, raw: &str, save: &SaveArgs) -> Result<()> {
    let session = ctx.session()?;
    let rt = ctx.runtime()?;
    let page = rt.block_on(session.open(raw, None))?;

    let temp = tempfile::Builder::new()
        .prefix(&format!("dwiki-{}-", page.id.leaf()))
        .suffix(".txt")
        .tempfile()
        .context("Failed to create temporary file")?;
    fs::write(temp.path(), &page.content).context("Failed to write temporary file")?;

    let editor = editor_command();
    let (program, args) = match editor.split_first() {
        Some(split) => split,
        None => bail!("No editor configured. Set $EDITOR."),
    };
    debug!(editor = %program, file = %temp.path().display(), "launching editor");

    let exit = Command::new(program)
        .args(args)
        .arg(temp.path())
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", program))?;
    if !exit.success() {
        bail!("Editor exited with {}; page not saved.", exit);
    }

    let edited = fs::read_to_string(temp.path()).context("Failed to read edited file")?;
    if edited == page.content {
        output::status(format!("No changes to {}", page.id), ctx.verbosity());
        return Ok(());
    }

    match rt.block_on(session.save(page.id.as_str(), None, &edited, save.to_request())) {
        Ok(id) => {
            output::status(format!("Saved {}", id), ctx.verbosity());
            Ok(())
        }
        Err(err) => {
            let kept = temp
                .into_temp_path()
                .keep()
                .context("Save failed and the edited file could not be kept")?;
            output::error(format!("your edits are in {}", kept.display()));
            Err(err).context(format!("Failed to save {}", page.id))
        }
    }
}
