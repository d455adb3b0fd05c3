//! complete
//!
//! Page link completion over the page cache.
//!
//! # Modes
//!
//! - **Selection**: the editor shows the whole cached list, the user picks
//!   one entry and [`selection_link`] produces the link text to insert.
//! - **In-buffer**: while typing, [`probe`] decides whether the text left of
//!   the cursor is a link token and returns its span plus the candidates.
//!   When the editor reports that completion finished, [`accept`] wraps the
//!   token in link syntax.
//!
//! Both modes only read a cache snapshot. Neither ever fetches.

mod buffer;

pub use buffer::{accept, probe, Completion, ExitStatus, TextEdit};

use crate::core::types::{absolute_link, PageId};

/// Candidates for selection and in-buffer completion, in cache order, in
/// absolute form (`:` + id).
pub fn candidates(pages: &[PageId]) -> Vec<String> {
    pages.iter().map(PageId::to_absolute).collect()
}

/// Link text for a page picked in selection mode, e.g. `[[:proj:a]]`.
///
/// An id that is already absolute is not prefixed a second time.
pub fn selection_link(id: &PageId) -> String {
    absolute_link(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(ids: &[&str]) -> Vec<PageId> {
        ids.iter().map(|id| PageId::new(*id).unwrap()).collect()
    }

    #[test]
    fn candidates_keep_server_order() {
        let cache = pages(&["proj:a", "proj:b", "top"]);
        assert_eq!(candidates(&cache), vec![":proj:a", ":proj:b", ":top"]);
    }

    #[test]
    fn selection_wraps_absolute() {
        let cache = pages(&["proj:a", "proj:b", "top"]);
        assert_eq!(selection_link(&cache[0]), "[[:proj:a]]");
        assert_eq!(selection_link(&PageId::new(":top").unwrap()), "[[:top]]");
    }

    #[test]
    fn accepting_a_candidate_inserts_wrapped_link() {
        let cache = pages(&["proj:a", "proj:b", "top"]);
        let line = "see :pr";
        let completion = probe(line, line.len(), &cache).unwrap();
        assert_eq!(completion.candidates, vec![":proj:a", ":proj:b", ":top"]);

        // The editor replaces the token with the chosen candidate.
        let mut typed = String::from(&line[..completion.start]);
        typed.push_str(&completion.candidates[0]);

        let edit = accept(&typed, typed.len(), ExitStatus::Finished).unwrap();
        assert_eq!(edit.apply(&typed), "see [[:proj:a]]");
    }
}
