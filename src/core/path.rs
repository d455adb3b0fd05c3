//! core::path
//!
//! Resolution of wiki link syntax into canonical page identifiers.
//!
//! # Rules
//!
//! Applied in order to the raw link text:
//!
//! 1. `::rest` is the escaped-absolute form: one colon is stripped and the
//!    remainder is returned verbatim. This is how a page literally named with
//!    a leading colon is referenced.
//! 2. `:rest` is already absolute and is returned unchanged (including the
//!    bare `:`).
//! 3. Any other text containing a colon:
//!    - `.:rest` is parent-relative and resolves to `namespace:rest`
//!    - text starting with a lowercase ASCII letter or digit is already
//!      fully qualified and returned unchanged
//!    - anything else is rejected as ambiguous
//! 4. Text with no colon is a bare leaf and resolves into the current
//!    namespace.
//!
//! When the current namespace is empty (top level), rules 3a and 4 yield the
//! bare remainder without a leading colon.
//!
//! # Example
//!
//! ```
//! use dwiki::core::path::resolve;
//!
//! assert_eq!(resolve("foo", "ns").unwrap().as_str(), "ns:foo");
//! assert_eq!(resolve(".:foo", "ns").unwrap().as_str(), "ns:foo");
//! assert_eq!(resolve("a:b", "ns").unwrap().as_str(), "a:b");
//! assert_eq!(resolve("::foo", "ns").unwrap().as_str(), ":foo");
//! assert!(resolve("Foo:bar", "ns").is_err());
//! ```

use thiserror::Error;

use super::types::{PageId, NAMESPACE_SEPARATOR};

/// Prefix of the parent-relative form.
const PARENT_RELATIVE_PREFIX: &str = ".:";

/// Prefix of the escaped-absolute form.
const ESCAPED_ABSOLUTE_PREFIX: &str = "::";

/// Errors from path resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The raw path uses colon syntax with no recognized prefix, or the
    /// resolved identifier is not a valid page id.
    #[error("invalid page path '{path}': {reason}")]
    InvalidPath {
        /// The offending input, verbatim.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl PathError {
    /// The offending input string.
    pub fn path(&self) -> &str {
        match self {
            PathError::InvalidPath { path, .. } => path,
        }
    }
}

/// Resolve a raw link string against the current namespace.
///
/// Pure and deterministic: performs no I/O.
///
/// # Errors
///
/// Returns `PathError::InvalidPath` naming `raw` when the colon syntax is
/// ambiguous, or when the result would be empty or contain whitespace.
pub fn resolve(raw: &str, namespace: &str) -> Result<PageId, PathError> {
    let resolved = if let Some(rest) = raw.strip_prefix(ESCAPED_ABSOLUTE_PREFIX) {
        format!("{}{}", NAMESPACE_SEPARATOR, rest)
    } else if raw.starts_with(NAMESPACE_SEPARATOR) {
        raw.to_string()
    } else if raw.contains(NAMESPACE_SEPARATOR) {
        if let Some(rest) = raw.strip_prefix(PARENT_RELATIVE_PREFIX) {
            join(namespace, rest)
        } else if starts_qualified(raw) {
            raw.to_string()
        } else {
            return Err(PathError::InvalidPath {
                path: raw.to_string(),
                reason: "relative colon syntax needs a '.:' prefix or a lowercase first segment",
            });
        }
    } else {
        join(namespace, raw)
    };

    PageId::new(resolved).map_err(|e| PathError::InvalidPath {
        path: raw.to_string(),
        reason: match e {
            super::types::TypeError::EmptyPageId(_) => "page id would be empty",
            super::types::TypeError::Whitespace(_) => "page ids cannot contain whitespace",
        },
    })
}

/// Join a leaf onto a namespace, leaving the leaf bare at top level.
fn join(namespace: &str, leaf: &str) -> String {
    if namespace.is_empty() {
        leaf.to_string()
    } else {
        format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, leaf)
    }
}

fn starts_qualified(raw: &str) -> bool {
    raw.chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(raw: &str, ns: &str) -> String {
        resolve(raw, ns).expect("resolve").as_str().to_string()
    }

    #[test]
    fn bare_leaf_joins_namespace() {
        assert_eq!(ok("foo", "ns"), "ns:foo");
        assert_eq!(ok("Foo", "a:b"), "a:b:Foo");
    }

    #[test]
    fn parent_relative_joins_namespace() {
        assert_eq!(ok(".:foo", "ns"), "ns:foo");
        assert_eq!(ok(".:sub:leaf", "ns"), "ns:sub:leaf");
    }

    #[test]
    fn qualified_path_unchanged() {
        assert_eq!(ok("a:b", "ns"), "a:b");
        assert_eq!(ok("2024:log", "ns"), "2024:log");
    }

    #[test]
    fn uppercase_qualified_path_rejected() {
        let err = resolve("Foo:bar", "ns").unwrap_err();
        assert_eq!(err.path(), "Foo:bar");
        assert!(err.to_string().contains("Foo:bar"));
    }

    #[test]
    fn double_dot_prefix_rejected() {
        assert!(resolve("..:foo", "ns").is_err());
        assert!(resolve("_x:foo", "ns").is_err());
    }

    #[test]
    fn absolute_unchanged() {
        assert_eq!(ok(":foo", "ns"), ":foo");
        assert_eq!(ok(":Foo:Bar", "ns"), ":Foo:Bar");
    }

    #[test]
    fn lone_colon_is_absolute_empty() {
        assert_eq!(ok(":", "ns"), ":");
    }

    #[test]
    fn escaped_absolute_strips_one_colon() {
        assert_eq!(ok("::foo", "ns"), ":foo");
        assert_eq!(ok(":::foo", "ns"), "::foo");
        assert_eq!(ok("::", "ns"), ":");
    }

    #[test]
    fn empty_namespace_yields_bare_leaf() {
        assert_eq!(ok("foo", ""), "foo");
        assert_eq!(ok(".:foo", ""), "foo");
    }

    #[test]
    fn empty_input_rejected() {
        let err = resolve("", "").unwrap_err();
        assert_eq!(err.path(), "");
    }

    #[test]
    fn whitespace_rejected_naming_input() {
        let err = resolve("my page", "ns").unwrap_err();
        assert_eq!(err.path(), "my page");
    }
}
