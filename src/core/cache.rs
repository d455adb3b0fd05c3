//! core::cache
//!
//! The page list cache.
//!
//! # Invariants
//!
//! The cache is either empty (never fetched) or a complete snapshot as of
//! its last successful refresh. Snapshots are immutable `Arc`s: a refresh
//! builds a new list and swaps it in wholesale, so a reader holding the old
//! snapshot is never disturbed. A failed refresh keeps the previous
//! snapshot and reports the error.
//!
//! Order is the server's order. Duplicate ids from the server are dropped,
//! keeping the first occurrence.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::types::PageId;
use crate::remote::{PageInfo, RemoteError, WikiClient};

/// An immutable page list snapshot.
pub type Snapshot = Arc<Vec<PageId>>;

/// Cached list of page identifiers.
#[derive(Debug, Default)]
pub struct PageCache {
    pages: Snapshot,
    fetched: bool,
}

impl PageCache {
    /// Create an empty, unfetched cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot, without any I/O.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.pages)
    }

    /// Whether the cache holds no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether a refresh has ever succeeded.
    pub fn is_fetched(&self) -> bool {
        self.fetched
    }

    /// List pages, fetching when the cache is empty or `force` is set.
    ///
    /// # Errors
    ///
    /// Propagates the enumeration failure. The previous snapshot stays in
    /// place and remains readable through [`PageCache::snapshot`].
    pub async fn list(
        &mut self,
        client: &WikiClient,
        force: bool,
    ) -> Result<Snapshot, RemoteError> {
        if !force && !self.pages.is_empty() {
            return Ok(self.snapshot());
        }

        match client.all_pages().await {
            Ok(entries) => {
                self.replace(entries);
                Ok(self.snapshot())
            }
            Err(err) => {
                warn!(
                    error = %err,
                    kept = self.pages.len(),
                    "page list refresh failed, keeping previous list"
                );
                Err(err)
            }
        }
    }

    /// Swap in a new snapshot built from a listing.
    pub fn replace(&mut self, entries: Vec<PageInfo>) {
        let mut seen = HashSet::with_capacity(entries.len());
        let ids: Vec<PageId> = entries
            .into_iter()
            .map(|entry| entry.id)
            .filter(|id| seen.insert(id.clone()))
            .collect();

        debug!(pages = ids.len(), "page list replaced");
        self.pages = Arc::new(ids);
        self.fetched = true;
    }
}
