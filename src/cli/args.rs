//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory (project config lookup)
//! - `--url <url>`: Override the XML-RPC endpoint
//! - `--namespace` / `-n <ns>`: Override the current namespace
//! - `--user <name>`: Override the login principal
//! - `--debug`: Enable debug logging
//! - `--interactive` / `--no-interactive`: Control prompts
//! - `--quiet` / `-q`: Data only; implies --no-interactive

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

/// dwiki - edit DokuWiki pages from the command line and your editor
#[derive(Parser, Debug)]
#[command(name = "dwiki")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if dwiki was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// XML-RPC endpoint, e.g. https://wiki.example.com/lib/exe/xmlrpc.php
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Current namespace for relative page paths
    #[arg(short, long, global = true, value_name = "NS")]
    pub namespace: Option<String>,

    /// Login user
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Data only; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable interactive prompts
    #[arg(long = "interactive", global = true, conflicts_with = "no_interactive")]
    pub interactive_flag: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Explicit interactive choice from flags, if any.
    ///
    /// `--interactive` wins; `--no-interactive` and `--quiet` disable.
    pub fn interactive_override(&self) -> Option<bool> {
        if self.interactive_flag {
            Some(true)
        } else if self.no_interactive || self.quiet {
            Some(false)
        } else {
            None
        }
    }

    /// Determine if interactive mode is enabled, given the configured
    /// default.
    ///
    /// Without an explicit flag, prompts need both the configured default
    /// and a terminal on stdin.
    pub fn interactive(&self, configured: bool) -> bool {
        self.interactive_override()
            .unwrap_or_else(|| configured && std::io::stdin().is_terminal())
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a page path to its canonical id
    #[command(
        long_about = "Resolve a page path to its canonical id.\n\n\
            Bare names resolve into the current namespace, '.:name' is relative \
            to the current namespace, ':name' is absolute and '::name' escapes a \
            leading colon. Paths like 'Foo:bar' are rejected as ambiguous.",
        after_help = "\
EXAMPLES:
    dwiki -n projects resolve notes        # projects:notes
    dwiki -n projects resolve .:alpha:todo # projects:alpha:todo
    dwiki resolve :start                   # :start"
    )]
    Resolve {
        /// Page path as written in a link
        path: String,
    },

    /// Print a page's content
    Get {
        /// Page path
        path: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save a page from a file or stdin
    Put {
        /// Page path
        path: String,

        /// Read content from this file (default: stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Edit a page in $EDITOR and save it back
    #[command(
        long_about = "Fetch a page into a temporary file, open it in $VISUAL or \
            $EDITOR, and save it back if it changed.\n\n\
            If the save fails the temporary file is kept and its path is printed, \
            so no edits are lost."
    )]
    Edit {
        /// Page path
        path: String,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// List all pages
    List {
        /// Ignore any cached list and refetch
        #[arg(long)]
        refresh: bool,

        /// Show modification time and size
        #[arg(short, long, conflicts_with = "json")]
        long: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pick a page interactively and print a link to it
    Select {
        /// Refetch the page list first
        #[arg(long)]
        refresh: bool,
    },

    /// Print link syntax for a page id
    Link {
        /// Page id
        id: String,
    },

    /// Print the wiki's title
    Title,

    /// Show endpoint, credentials and server version
    Status,

    /// Open a page in the web browser
    Browse {
        /// Page path (default: the namespace start page)
        path: Option<String>,
    },

    /// Store, check or remove wiki credentials
    #[command(after_help = "\
EXAMPLES:
    dwiki auth                          # prompt for user and password
    printf '%s' \"$PW\" | dwiki auth --user alice --password-stdin
    dwiki auth --status
    dwiki auth --logout")]
    Auth {
        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,

        /// Show whether credentials are stored
        #[arg(long, conflicts_with_all = ["logout", "password_stdin"])]
        status: bool,

        /// Remove stored credentials
        #[arg(long, conflicts_with = "password_stdin")]
        logout: bool,
    },

    /// Get, set, or list configuration values
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(after_help = "\
EXAMPLES:
    dwiki completion bash >> ~/.bashrc
    dwiki completion zsh >> ~/.zshrc
    dwiki completion fish > ~/.config/fish/completions/dwiki.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Serve editor requests as JSON lines on stdin/stdout
    Serve,
}

/// Save options shared by `put` and `edit`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SaveArgs {
    /// Edit summary
    #[arg(short, long)]
    pub summary: Option<String>,

    /// Mark as a minor edit
    #[arg(long)]
    pub minor: bool,

    /// Record as a major edit, overriding save.minor
    #[arg(long, conflicts_with = "minor")]
    pub no_minor: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key, e.g. wiki.url
        key: String,
    },
    /// Set a configuration value in the global file
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
