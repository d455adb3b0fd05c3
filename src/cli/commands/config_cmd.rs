//! config command - Get, set, or list global configuration values

use crate::cli::ConfigAction;
use crate::core::config::{Config, KEYS};
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

/// Run a config subcommand against the global config file.
pub fn config(action: &ConfigAction, verbosity: Verbosity) -> Result<()> {
    match action {
        ConfigAction::Get { key } => get(key),
        ConfigAction::Set { key, value } => set(key, value, verbosity),
        ConfigAction::List => list(),
    }
}

/// Print one value. An unset key prints nothing.
fn get(key: &str) -> Result<()> {
    let (file, _) = Config::read_global().context("Failed to load config")?;
    if let Some(value) = file.get(key)? {
        output::data(value);
    }
    Ok(())
}

/// Set one value and write the file back.
fn set(key: &str, value: &str, verbosity: Verbosity) -> Result<()> {
    let (mut file, _) = Config::read_global().context("Failed to load config")?;
    file.set(key, value)?;
    let path = Config::write_global(&file).context("Failed to write config")?;

    output::status(
        format!("Set {} = {} in {}", key, value, path.display()),
        verbosity,
    );
    Ok(())
}

/// Print every known key.
fn list() -> Result<()> {
    let (file, path) = Config::read_global().context("Failed to load config")?;

    output::data(format!("# {}", path.display()));
    for key in KEYS {
        match file.get(key)? {
            Some(value) => output::data(format!("{} = {}", key, value)),
            None => output::data(format!("{} = (not set)", key)),
        }
    }
    Ok(())
}
