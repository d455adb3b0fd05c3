//! Property-based tests for path resolution and completion.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use dwiki::complete::{accept, probe, ExitStatus};
use dwiki::core::path::resolve;
use dwiki::core::types::PageId;

/// Strategy for a single page name segment.
fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_.-]{0,12}"
}

/// Strategy for namespaces, including the top level.
fn namespace() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        prop::collection::vec(segment(), 1..4).prop_map(|parts| parts.join(":")),
    ]
}

/// Strategy for arbitrary non-whitespace path text.
fn path_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9:._-]{1,24}"
}

proptest! {
    #[test]
    fn escaped_absolute_strips_exactly_one_colon(rest in path_text(), ns in namespace()) {
        let raw = format!("::{}", rest);
        let id = resolve(&raw, &ns).unwrap();
        prop_assert_eq!(id.as_str(), &raw[1..]);
    }

    #[test]
    fn absolute_paths_are_unchanged(
        rest in "[A-Za-z0-9._-][A-Za-z0-9:._-]{0,20}",
        ns in namespace()
    ) {
        let raw = format!(":{}", rest);
        let id = resolve(&raw, &ns).unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
    }

    #[test]
    fn bare_leaf_joins_namespace(leaf in "[A-Za-z0-9._-]{1,16}", ns in namespace()) {
        let id = resolve(&leaf, &ns).unwrap();
        if ns.is_empty() {
            prop_assert_eq!(id.as_str(), leaf.as_str());
        } else {
            prop_assert_eq!(id.as_str(), format!("{}:{}", ns, leaf));
            prop_assert_eq!(id.leaf(), leaf.as_str());
        }
    }

    #[test]
    fn parent_relative_matches_bare_join(rest in segment(), ns in namespace()) {
        let relative = resolve(&format!(".:{}", rest), &ns).unwrap();
        let bare = resolve(&rest, &ns).unwrap();
        prop_assert_eq!(relative, bare);
    }

    #[test]
    fn qualified_paths_ignore_namespace(
        parts in prop::collection::vec(segment(), 2..4),
        ns in namespace()
    ) {
        let raw = parts.join(":");
        let id = resolve(&raw, &ns).unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
    }

    #[test]
    fn uppercase_qualified_paths_are_rejected(head in "[A-Z][a-z]{0,6}", tail in segment()) {
        let raw = format!("{}:{}", head, tail);
        prop_assert!(resolve(&raw, "ns").is_err());
    }

    #[test]
    fn resolved_ids_never_contain_whitespace(raw in "\\PC{0,20}", ns in namespace()) {
        if let Ok(id) = resolve(&raw, &ns) {
            prop_assert!(!id.as_str().chars().any(char::is_whitespace));
            prop_assert!(!id.as_str().is_empty());
        }
    }

    #[test]
    fn probe_never_panics_on_any_cursor(line in "\\PC{0,30}", cursor in 0usize..40) {
        let pages = vec![PageId::new("a:b").unwrap()];
        if let Some(c) = probe(&line, cursor, &pages) {
            prop_assert!(c.start <= c.end);
            prop_assert_eq!(c.end, cursor);
            prop_assert!(c.token.starts_with(':') || c.token.contains(':'));
        }
    }

    #[test]
    fn accept_wraps_exactly_once(token in ":[a-z]{1,6}(:[a-z]{1,6}){0,2}") {
        let once = accept(&token, token.len(), ExitStatus::Finished).unwrap();
        let line = once.apply(&token);
        prop_assert_eq!(&line, &format!("[[{}]]", token));

        let twice = accept(&line, line.len(), ExitStatus::Finished).unwrap();
        prop_assert_eq!(twice.apply(&line), line);
    }
}
