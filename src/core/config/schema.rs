//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same schema is used for the global file and the project file; the
//! project file overrides the global one key by key.
//!
//! # Validation
//!
//! Values are validated after parsing: the endpoint must be an http(s) URL,
//! the secrets provider must be known, and the timeout must be positive.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// One configuration file.
///
/// # Example
///
/// ```toml
/// interactive = true
///
/// [wiki]
/// url = "https://wiki.example.com/lib/exe/xmlrpc.php"
/// user = "alice"
/// namespace = "projects"
/// timeout_secs = 30
///
/// [save]
/// summary = "edited with dwiki"
/// minor = false
///
/// [secrets]
/// provider = "file"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Default interactive mode
    pub interactive: Option<bool>,

    /// Endpoint settings
    pub wiki: Option<WikiConfig>,

    /// Save defaults
    pub save: Option<SaveDefaults>,

    /// Secret storage settings
    pub secrets: Option<SecretsConfig>,
}

/// Keys accepted by `dwiki config get|set`.
pub const KEYS: &[&str] = &[
    "wiki.url",
    "wiki.user",
    "wiki.namespace",
    "wiki.timeout_secs",
    "save.summary",
    "save.minor",
    "secrets.provider",
    "interactive",
];

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(wiki) = &self.wiki {
            wiki.validate()?;
        }
        if let Some(secrets) = &self.secrets {
            secrets.validate()?;
        }
        Ok(())
    }

    /// Read a dotted key as a display string. `None` when unset.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let wiki = self.wiki.as_ref();
        let save = self.save.as_ref();
        let value = match key {
            "wiki.url" => wiki.and_then(|w| w.url.clone()),
            "wiki.user" => wiki.and_then(|w| w.user.clone()),
            "wiki.namespace" => wiki.and_then(|w| w.namespace.clone()),
            "wiki.timeout_secs" => wiki.and_then(|w| w.timeout_secs).map(|t| t.to_string()),
            "save.summary" => save.and_then(|s| s.summary.clone()),
            "save.minor" => save.and_then(|s| s.minor).map(|m| m.to_string()),
            "secrets.provider" => self.secrets.as_ref().and_then(|s| s.provider.clone()),
            "interactive" => self.interactive.map(|i| i.to_string()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Set a dotted key from its string form, then validate.
    ///
    /// # Errors
    ///
    /// - `UnknownKey` for keys not in [`KEYS`]
    /// - `InvalidValue` for values that do not parse or validate
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "wiki.url" => self.wiki_mut().url = Some(value.to_string()),
            "wiki.user" => self.wiki_mut().user = Some(value.to_string()),
            "wiki.namespace" => self.wiki_mut().namespace = Some(value.to_string()),
            "wiki.timeout_secs" => self.wiki_mut().timeout_secs = Some(parse_value(key, value)?),
            "save.summary" => self.save_mut().summary = Some(value.to_string()),
            "save.minor" => self.save_mut().minor = Some(parse_value(key, value)?),
            "secrets.provider" => {
                self.secrets.get_or_insert_with(Default::default).provider = Some(value.to_string())
            }
            "interactive" => self.interactive = Some(parse_value(key, value)?),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        self.validate()
    }

    fn wiki_mut(&mut self) -> &mut WikiConfig {
        self.wiki.get_or_insert_with(Default::default)
    }

    fn save_mut(&mut self) -> &mut SaveDefaults {
        self.save.get_or_insert_with(Default::default)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| {
        ConfigError::InvalidValue(format!("'{}' is not a valid value for {}", value, key))
    })
}

/// Endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WikiConfig {
    /// XML-RPC endpoint, e.g. `https://host/lib/exe/xmlrpc.php`
    pub url: Option<String>,

    /// Login principal when none is stored
    pub user: Option<String>,

    /// Current namespace for relative links
    pub namespace: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl WikiConfig {
    /// Validate the endpoint settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            super::parse_endpoint(url)?;
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "wiki.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(ns) = &self.namespace {
            if ns.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidValue(format!(
                    "wiki.namespace '{}' cannot contain whitespace",
                    ns
                )));
            }
        }
        Ok(())
    }
}

/// Save defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SaveDefaults {
    /// Default edit summary
    pub summary: Option<String>,

    /// Mark saves as minor edits
    pub minor: Option<bool>,
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsConfig {
    /// Provider to use ("file" or "keychain")
    pub provider: Option<String>,
}

impl SecretsConfig {
    /// Validate the secrets configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            let valid = crate::secrets::VALID_PROVIDERS;
            if !valid.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid secrets provider '{}', must be one of: {}",
                    provider,
                    valid.join(", ")
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_file() {
        let file: ConfigFile = toml::from_str(
            r#"
            interactive = false

            [wiki]
            url = "https://wiki.example.com/lib/exe/xmlrpc.php"
            user = "alice"
            namespace = "projects"
            timeout_secs = 10

            [save]
            summary = "via dwiki"
            minor = true

            [secrets]
            provider = "file"
            "#,
        )
        .unwrap();

        assert_eq!(file.interactive, Some(false));
        let wiki = file.wiki.as_ref().unwrap();
        assert_eq!(wiki.user.as_deref(), Some("alice"));
        assert_eq!(wiki.timeout_secs, Some(10));
        assert_eq!(file.save.as_ref().unwrap().minor, Some(true));
        file.validate().unwrap();
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str(
            r#"
            [wiki]
            url = "https://w/lib/exe/xmlrpc.php"
            colour = "blue"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn invalid_provider_rejected() {
        let file = ConfigFile {
            secrets: Some(SecretsConfig {
                provider: Some("vault".into()),
            }),
            ..Default::default()
        };
        let err = file.validate().unwrap_err().to_string();
        assert!(err.contains("vault"));
    }

    #[test]
    fn invalid_url_rejected() {
        let mut file = ConfigFile::default();
        assert!(file.set("wiki.url", "ftp://wiki/xmlrpc.php").is_err());
        assert!(file.set("wiki.url", "not a url").is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut file = ConfigFile::default();
        assert!(matches!(
            file.set("wiki.timeout_secs", "0"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            file.set("wiki.timeout_secs", "soon"),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn get_and_set_every_key() {
        let mut file = ConfigFile::default();
        let values = [
            ("wiki.url", "https://wiki.example.com/lib/exe/xmlrpc.php"),
            ("wiki.user", "alice"),
            ("wiki.namespace", "team:docs"),
            ("wiki.timeout_secs", "15"),
            ("save.summary", "tidy"),
            ("save.minor", "true"),
            ("secrets.provider", "file"),
            ("interactive", "false"),
        ];
        assert_eq!(values.len(), KEYS.len());

        for (key, value) in values {
            assert_eq!(file.get(key).unwrap(), None);
            file.set(key, value).unwrap();
            assert_eq!(file.get(key).unwrap().as_deref(), Some(value));
        }
    }

    #[test]
    fn unknown_key() {
        let mut file = ConfigFile::default();
        assert!(matches!(file.get("wiki.colour"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            file.set("trunk", "main"),
            Err(ConfigError::UnknownKey(_))
        ));
    }
}
