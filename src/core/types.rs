//! core::types
//!
//! Strong types for wiki page addressing.
//!
//! # Types
//!
//! - [`PageId`] - Canonical colon-delimited page identifier
//!
//! # Link Syntax
//!
//! A page reference embedded in wiki content is written as the identifier
//! surrounded by double square brackets, e.g. `[[projects:alpha:notes]]`.
//! [`wrap_link`] and [`absolute_link`] produce that syntax.
//!
//! # Examples
//!
//! ```
//! use dwiki::core::types::PageId;
//!
//! let id = PageId::new("projects:alpha:notes").unwrap();
//! assert_eq!(id.namespace(), Some("projects:alpha"));
//! assert_eq!(id.leaf(), "notes");
//!
//! assert!(PageId::new("has space").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid page id '{0}': page ids cannot be empty")]
    EmptyPageId(String),

    #[error("invalid page id '{0}': page ids cannot contain whitespace")]
    Whitespace(String),
}

/// A canonical page identifier.
///
/// Identifiers are colon-separated namespace segments followed by a leaf
/// name. Segments are opaque and case-sensitive. A leading colon marks an
/// absolute identifier; the bare `:` (absolute-empty) is representable.
///
/// The only structural rules enforced here are non-emptiness and the
/// absence of whitespace. Everything else is the server's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageId(String);

impl PageId {
    /// Create a validated page identifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError` if the identifier is empty or contains whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::EmptyPageId(id));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(TypeError::Whitespace(id));
        }
        Ok(Self(id))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier carries a leading colon.
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with(NAMESPACE_SEPARATOR)
    }

    /// The namespace prefix (everything before the final segment).
    ///
    /// Returns `None` for top-level pages.
    ///
    /// ```
    /// use dwiki::core::types::PageId;
    ///
    /// assert_eq!(PageId::new("a:b:c").unwrap().namespace(), Some("a:b"));
    /// assert_eq!(PageId::new("top").unwrap().namespace(), None);
    /// ```
    pub fn namespace(&self) -> Option<&str> {
        let trimmed = self.0.trim_start_matches(NAMESPACE_SEPARATOR);
        trimmed
            .rfind(NAMESPACE_SEPARATOR)
            .map(|idx| &trimmed[..idx])
    }

    /// The final segment of the identifier.
    pub fn leaf(&self) -> &str {
        match self.0.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// The identifier in absolute form (with exactly one leading colon).
    pub fn to_absolute(&self) -> String {
        if self.is_absolute() {
            self.0.clone()
        } else {
            format!("{}{}", NAMESPACE_SEPARATOR, self.0)
        }
    }
}

impl TryFrom<String> for PageId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageId> for String {
    fn from(id: PageId) -> Self {
        id.0
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wrap arbitrary text in link syntax: `text` becomes `[[text]]`.
pub fn wrap_link(text: &str) -> String {
    format!("[[{}]]", text)
}

/// Link syntax for an identifier in absolute form, e.g. `[[:proj:a]]`.
pub fn absolute_link(id: &PageId) -> String {
    wrap_link(&id.to_absolute())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_id_rejects_empty() {
        assert_eq!(PageId::new(""), Err(TypeError::EmptyPageId(String::new())));
    }

    #[test]
    fn page_id_rejects_whitespace() {
        assert!(PageId::new("a b").is_err());
        assert!(PageId::new("a\tb").is_err());
        assert!(PageId::new("trailing\n").is_err());
    }

    #[test]
    fn page_id_accepts_absolute_empty() {
        let id = PageId::new(":").unwrap();
        assert!(id.is_absolute());
        assert_eq!(id.leaf(), "");
        assert_eq!(id.namespace(), None);
    }

    #[test]
    fn namespace_ignores_leading_colon() {
        let id = PageId::new(":proj:notes").unwrap();
        assert_eq!(id.namespace(), Some("proj"));
        assert_eq!(id.leaf(), "notes");
    }

    #[test]
    fn segments_are_case_sensitive() {
        assert_ne!(PageId::new("Wiki:Page").unwrap(), PageId::new("wiki:page").unwrap());
    }

    #[test]
    fn to_absolute_adds_single_colon() {
        assert_eq!(PageId::new("proj:a").unwrap().to_absolute(), ":proj:a");
        assert_eq!(PageId::new(":proj:a").unwrap().to_absolute(), ":proj:a");
    }

    #[test]
    fn link_helpers() {
        assert_eq!(wrap_link(":x"), "[[:x]]");
        assert_eq!(absolute_link(&PageId::new("proj:a").unwrap()), "[[:proj:a]]");
    }

    #[test]
    fn serde_roundtrip_validates() {
        let id: PageId = serde_json::from_str("\"ns:page\"").unwrap();
        assert_eq!(id.as_str(), "ns:page");
        assert!(serde_json::from_str::<PageId>("\"bad id\"").is_err());
    }
}
