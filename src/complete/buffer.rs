//! complete::buffer
//!
//! In-buffer completion: trigger detection, token boundary, and the
//! post-completion wrap.
//!
//! All offsets are byte offsets into the line. A cursor that is past the
//! end of the line or not on a character boundary never triggers.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::candidates;
use crate::core::types::{wrap_link, PageId};

/// A colon followed by letters and colons, ending at the cursor.
static TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[\p{L}:]+$").expect("valid link trigger regex"));

/// An active in-buffer completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Start of the token being completed.
    pub start: usize,
    /// End of the token (the cursor).
    pub end: usize,
    /// The token text.
    pub token: String,
    /// Candidate completions.
    pub candidates: Vec<String>,
}

/// How the editor's completion session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitStatus {
    /// A candidate was chosen and completion is over.
    Finished,
    /// The only candidate was inserted but completion may continue.
    Sole,
    /// The text exactly matches a candidate but others remain.
    Exact,
    /// The user is cycling through candidates.
    Cycling,
}

/// A replacement of `start..end` in a line by `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl TextEdit {
    /// Apply the edit to `line`.
    pub fn apply(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len() + self.text.len());
        out.push_str(&line[..self.start]);
        out.push_str(&self.text);
        out.push_str(&line[self.end..]);
        out
    }

    /// Cursor position after the edit.
    pub fn cursor(&self) -> usize {
        self.start + self.text.len()
    }
}

/// The text left of the cursor, if the cursor is valid.
fn before_cursor(line: &str, cursor: usize) -> Option<&str> {
    line.get(..cursor)
}

/// Start of the whitespace-delimited token ending at `end`.
fn token_start(text: &str, end: usize) -> usize {
    text[..end]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(idx, c)| idx + c.len_utf8())
        .unwrap_or(0)
}

/// Check whether completion should activate at `cursor`.
///
/// Returns the token span and the full cached list as candidates, or
/// `None` when the text left of the cursor is not a link token.
pub fn probe(line: &str, cursor: usize, pages: &[PageId]) -> Option<Completion> {
    let before = before_cursor(line, cursor)?;
    let found = TRIGGER.find(before)?;
    let start = token_start(before, found.start());

    Some(Completion {
        start,
        end: cursor,
        token: before[start..].to_string(),
        candidates: candidates(pages),
    })
}

/// Wrap the token before the cursor in link syntax once completion has
/// finished.
///
/// Only [`ExitStatus::Finished`] produces an edit. A token that is already
/// wrapped (or half-wrapped) is wrapped exactly once.
pub fn accept(line: &str, cursor: usize, status: ExitStatus) -> Option<TextEdit> {
    if status != ExitStatus::Finished {
        return None;
    }

    let before = before_cursor(line, cursor)?;
    let start = token_start(before, cursor);
    let token = &before[start..];
    let inner = token.strip_prefix("[[").unwrap_or(token);
    let inner = inner.strip_suffix("]]").unwrap_or(inner);
    if inner.is_empty() {
        return None;
    }

    Some(TextEdit {
        start,
        end: cursor,
        text: wrap_link(inner),
    })
}
