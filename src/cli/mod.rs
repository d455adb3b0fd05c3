//! cli
//!
//! Command-line interface layer for dwiki.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Set up logging
//! - Load configuration and build the [`Context`]
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers build a [`Session`](crate::session::Session)
//! and call its operations; path resolution, the login-and-retry policy and
//! the page cache all live below this layer.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, ConfigAction, SaveArgs, Shell};

use anyhow::{Context as _, Result};
use tracing::Level;

use crate::core::config::{Config, Overrides};
use crate::session::Session;
use crate::ui::output::{self, Verbosity};

/// Execution context shared by command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (data only).
    pub quiet: bool,
    /// Interactive prompts enabled.
    pub interactive: bool,
    /// Merged configuration including CLI overrides.
    pub config: Config,
}

impl Context {
    /// Output verbosity derived from the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Build a session from the configuration.
    pub fn session(&self) -> Result<Session> {
        Session::connect(&self.config, self.interactive).context("Failed to set up wiki session")
    }

    /// A runtime for async commands.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime> {
        tokio::runtime::Runtime::new().context("Failed to start async runtime")
    }
}

/// Install the stderr log subscriber: warnings by default, debug with
/// `--debug`.
pub fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    // These work without a loadable configuration.
    match &cli.command {
        Command::Completion { shell } => return commands::completion(*shell),
        Command::Config { action } => return commands::config(action, verbosity),
        _ => {}
    }

    let cwd = match &cli.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let loaded = Config::load(Some(&cwd)).context("Failed to load configuration")?;
    for warning in &loaded.warnings {
        match &warning.path {
            Some(path) => output::warn(
                format!("{}: {}", path.display(), warning.message),
                verbosity,
            ),
            None => output::warn(&warning.message, verbosity),
        }
    }

    let config = loaded.config.with_overrides(Overrides {
        url: cli.url.clone(),
        namespace: cli.namespace.clone(),
        user: cli.user.clone(),
    });

    let ctx = Context {
        interactive: cli.interactive(config.interactive()),
        debug: cli.debug,
        quiet: cli.quiet,
        config,
    };

    commands::dispatch(cli.command, &ctx)
}
