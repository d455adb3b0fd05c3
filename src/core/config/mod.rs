//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! dwiki has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: `.dwiki.toml` in the working directory or the nearest
//!   ancestor that has one
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. `DWIKI_URL` environment variable (endpoint only)
//! 5. CLI flags, via [`Config::with_overrides`]
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$DWIKI_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/dwiki/config.toml`
//! 3. `~/.dwiki/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use dwiki::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! let config = result.config;
//!
//! match config.endpoint() {
//!     Ok(url) => println!("Endpoint: {}", url),
//!     Err(e) => eprintln!("{}", e),
//! }
//! println!("Namespace: {}", config.namespace());
//! ```

pub mod schema;

pub use schema::{ConfigFile, SaveDefaults, SecretsConfig, WikiConfig, KEYS};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Name of the project config file.
pub const PROJECT_FILE: &str = ".dwiki.toml";

/// Environment variable overriding the endpoint.
pub const URL_ENV: &str = "DWIKI_URL";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    #[error("no wiki endpoint configured (set wiki.url, e.g. `dwiki config set wiki.url https://host/lib/exe/xmlrpc.php`, or export DWIKI_URL)")]
    MissingEndpoint,

    #[error("home directory not found")]
    NoHomeDir,
}

/// Parse and check an endpoint URL.
pub(crate) fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidValue(format!("invalid wiki.url '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ConfigError::InvalidValue(format!(
            "invalid wiki.url '{}': must be an http(s) URL with a host",
            raw
        ))),
    }
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning, if any.
    pub path: Option<PathBuf>,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Endpoint URL
    pub url: Option<String>,
    /// Current namespace
    pub namespace: Option<String>,
    /// Login principal
    pub user: Option<String>,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence automatically.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: ConfigFile,
    /// Project configuration (if found)
    pub project: Option<ConfigFile>,
    /// Endpoint from the environment
    env_url: Option<String>,
    /// CLI overrides
    overrides: Overrides,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the project config file (if loaded)
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `cwd` is provided, the project file is searched from there
    /// upwards.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(cwd: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let global_path = Self::find_global();
        let project_path = cwd.and_then(Self::find_project);
        let env_url = std::env::var(URL_ENV).ok().filter(|u| !u.is_empty());
        Self::from_paths(global_path, project_path, env_url)
    }

    /// Load configuration from explicit file locations.
    pub fn from_paths(
        global_path: Option<PathBuf>,
        project_path: Option<PathBuf>,
        env_url: Option<String>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let global = match &global_path {
            Some(path) => Self::read_config(path)?,
            None => ConfigFile::default(),
        };
        let project = match &project_path {
            Some(path) => Some(Self::read_config(path)?),
            None => None,
        };

        global.validate()?;
        if let Some(p) = &project {
            p.validate()?;
            if p.secrets.is_some() {
                warnings.push(ConfigWarning {
                    message: "[secrets] in a project config file selects where your password is stored for every checkout of this project".to_string(),
                    path: project_path.clone(),
                });
            }
        }
        if let Some(url) = &env_url {
            parse_endpoint(url)?;
        }

        let config = Config {
            global,
            project,
            env_url,
            overrides: Overrides::default(),
            global_path,
            project_path,
        };

        if let Ok(url) = config.endpoint() {
            if !url.path().ends_with("xmlrpc.php") {
                warnings.push(ConfigWarning {
                    message: format!(
                        "endpoint '{}' does not end in xmlrpc.php; DokuWiki serves XML-RPC at /lib/exe/xmlrpc.php",
                        url
                    ),
                    path: None,
                });
            }
        }

        Ok(ConfigLoadResult { config, warnings })
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Locate the global config file.
    fn find_global() -> Option<PathBuf> {
        // 1. Check $DWIKI_CONFIG
        if let Ok(path) = std::env::var("DWIKI_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/dwiki/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("dwiki/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.dwiki/config.toml
        let path = dirs::home_dir()?.join(".dwiki/config.toml");
        path.exists().then_some(path)
    }

    /// Find `.dwiki.toml` in `start` or its nearest ancestor.
    pub fn find_project(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for global config.
    ///
    /// Honors `$DWIKI_CONFIG`, otherwise `~/.dwiki/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var("DWIKI_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".dwiki/config.toml"))
    }

    /// Read the global file for editing, defaults if absent.
    pub fn read_global() -> Result<(ConfigFile, PathBuf), ConfigError> {
        let path = Self::global_config_path()?;
        let file = if path.exists() {
            Self::read_config(&path)?
        } else {
            ConfigFile::default()
        };
        Ok((file, path))
    }

    /// Write global config atomically.
    pub fn write_global(config: &ConfigFile) -> Result<PathBuf, ConfigError> {
        let path = Self::global_config_path()?;
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed; writes a sibling temp file and
    /// renames it into place.
    pub fn write_config_atomic(path: &Path, config: &ConfigFile) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// First value found walking from project to global.
    fn lookup<T>(&self, pick: impl Fn(&ConfigFile) -> Option<T>) -> Option<T> {
        self.project.as_ref().and_then(&pick).or_else(|| pick(&self.global))
    }

    /// The XML-RPC endpoint.
    ///
    /// # Errors
    ///
    /// `MissingEndpoint` when no source sets it.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let raw = self
            .overrides
            .url
            .clone()
            .or_else(|| self.env_url.clone())
            .or_else(|| self.lookup(|f| f.wiki.as_ref().and_then(|w| w.url.clone())))
            .ok_or(ConfigError::MissingEndpoint)?;
        parse_endpoint(&raw)
    }

    /// Configured login principal.
    pub fn user(&self) -> Option<String> {
        self.overrides
            .user
            .clone()
            .or_else(|| self.lookup(|f| f.wiki.as_ref().and_then(|w| w.user.clone())))
    }

    /// Current namespace for relative links. Empty means top level.
    pub fn namespace(&self) -> String {
        self.overrides
            .namespace
            .clone()
            .or_else(|| self.lookup(|f| f.wiki.as_ref().and_then(|w| w.namespace.clone())))
            .unwrap_or_default()
    }

    /// Request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .lookup(|f| f.wiki.as_ref().and_then(|w| w.timeout_secs))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Default edit summary. Defaults to empty.
    pub fn save_summary(&self) -> String {
        self.lookup(|f| f.save.as_ref().and_then(|s| s.summary.clone()))
            .unwrap_or_default()
    }

    /// Whether saves are minor edits by default.
    pub fn save_minor(&self) -> bool {
        self.lookup(|f| f.save.as_ref().and_then(|s| s.minor))
            .unwrap_or(false)
    }

    /// Get the secrets provider.
    ///
    /// Defaults to "file" if not configured.
    pub fn secrets_provider(&self) -> String {
        self.lookup(|f| f.secrets.as_ref().and_then(|s| s.provider.clone()))
            .unwrap_or_else(|| crate::secrets::DEFAULT_PROVIDER.to_string())
    }

    /// Check if interactive mode is enabled by default.
    ///
    /// Defaults to `true` if not configured.
    pub fn interactive(&self) -> bool {
        self.lookup(|f| f.interactive).unwrap_or(true)
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}
