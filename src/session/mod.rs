//! session
//!
//! The editor-facing orchestrator.
//!
//! # Ownership
//!
//! A [`Session`] owns the [`WikiClient`] and the [`PageCache`]. There is no
//! global cache: whoever drives editor commands holds the session, and the
//! cache lives exactly as long as it does. `list` and `refresh` are the only
//! operations that replace the cache.
//!
//! # Flow
//!
//! ```text
//! raw path -> resolve -> WikiClient (get/put) -> PageCache (list on demand)
//! ```

mod error;
pub mod protocol;

pub use error::{remote_kind, ErrorKind, SessionError};

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::auth::{StoreCredentialProvider, TerminalPrompt};
use crate::complete::{self, Completion, ExitStatus, TextEdit};
use crate::core::cache::{PageCache, Snapshot};
use crate::core::config::Config;
use crate::core::path;
use crate::core::types::PageId;
use crate::remote::{HttpTransport, PageInfo, PutOptions, WikiClient};
use crate::secrets;

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenedPage {
    /// Resolved identifier
    pub id: PageId,
    /// Content, empty for a page that does not exist yet
    pub content: String,
    /// Whether the page exists on the server
    pub exists: bool,
}

/// A save request.
#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    /// Edit summary; the configured default when `None`
    pub summary: Option<String>,
    /// Minor edit flag; the configured default when `None`
    pub minor: Option<bool>,
}

/// Client, cache and defaults for one editor process.
pub struct Session {
    client: WikiClient,
    cache: PageCache,
    namespace: String,
    save_defaults: PutOptions,
}

impl Session {
    /// Create a session over an existing client.
    pub fn new(client: WikiClient, namespace: impl Into<String>) -> Self {
        Self {
            client,
            cache: PageCache::new(),
            namespace: namespace.into(),
            save_defaults: PutOptions::default(),
        }
    }

    /// Use these summary/minor values when a save does not specify them.
    pub fn with_save_defaults(mut self, defaults: PutOptions) -> Self {
        self.save_defaults = defaults;
        self
    }

    /// Build a session from configuration.
    ///
    /// Connects nothing yet: the first remote call happens on first use.
    ///
    /// # Errors
    ///
    /// - `Config` when no endpoint is configured
    /// - `Secrets` when the configured secret store is unavailable
    pub fn connect(config: &Config, interactive: bool) -> Result<Self, SessionError> {
        let endpoint = config.endpoint()?;
        let transport = HttpTransport::new(endpoint, Some(config.timeout()))?;

        let store: Arc<dyn secrets::SecretStore> =
            Arc::from(secrets::create_store(&config.secrets_provider())?);
        let provider = StoreCredentialProvider::new(store).with_default_user(config.user());
        let prompt = TerminalPrompt::new(interactive).with_default_user(config.user());

        debug!(endpoint = %transport.url(), interactive, "session configured");

        let client = WikiClient::new(Arc::new(transport), Arc::new(provider))
            .with_prompt(Arc::new(prompt));

        Ok(Self::new(client, config.namespace()).with_save_defaults(PutOptions {
            summary: config.save_summary(),
            minor: config.save_minor(),
        }))
    }

    /// The underlying client.
    pub fn client(&self) -> &WikiClient {
        &self.client
    }

    /// The current namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Resolve a raw path, in `namespace` if given, else the session's.
    pub fn resolve(&self, raw: &str, namespace: Option<&str>) -> Result<PageId, SessionError> {
        let ns = namespace.unwrap_or(&self.namespace);
        Ok(path::resolve(raw, ns)?)
    }

    /// Fetch a page for editing.
    pub async fn open(
        &self,
        raw: &str,
        namespace: Option<&str>,
    ) -> Result<OpenedPage, SessionError> {
        let id = self.resolve(raw, namespace)?;
        let content = self.client.get_page(&id).await?;
        debug!(page = %id, exists = content.is_some(), "page opened");
        Ok(OpenedPage {
            exists: content.is_some(),
            content: content.unwrap_or_default(),
            id,
        })
    }

    /// Save a page. Only returns `Ok` once the server accepted the save.
    pub async fn save(
        &self,
        raw: &str,
        namespace: Option<&str>,
        content: &str,
        request: SaveRequest,
    ) -> Result<PageId, SessionError> {
        let id = self.resolve(raw, namespace)?;
        let options = PutOptions {
            summary: request
                .summary
                .unwrap_or_else(|| self.save_defaults.summary.clone()),
            minor: request.minor.unwrap_or(self.save_defaults.minor),
        };
        self.client.put_page(&id, content, &options).await?;
        info!(page = %id, bytes = content.len(), minor = options.minor, "page saved");
        Ok(id)
    }

    /// The cached page list, fetching when empty or when `refresh` is set.
    pub async fn list(&mut self, refresh: bool) -> Result<Snapshot, SessionError> {
        Ok(self.cache.list(&self.client, refresh).await?)
    }

    /// Fetch the full listing with sizes and times, refreshing the cache
    /// from it.
    pub async fn list_detailed(&mut self) -> Result<Vec<PageInfo>, SessionError> {
        let entries = self.client.all_pages().await?;
        self.cache.replace(entries.clone());
        Ok(entries)
    }

    /// The current snapshot without any I/O.
    pub fn snapshot(&self) -> Snapshot {
        self.cache.snapshot()
    }

    /// Selection-mode candidates.
    pub async fn candidates(&mut self, refresh: bool) -> Result<Vec<String>, SessionError> {
        let pages = self.list(refresh).await?;
        Ok(complete::candidates(&pages))
    }

    /// Link text for a page chosen in selection mode.
    pub fn link(&self, id: &str) -> Result<String, SessionError> {
        let id = PageId::new(id)?;
        Ok(complete::selection_link(&id))
    }

    /// In-buffer completion probe. Never fetches.
    pub fn complete(&self, line: &str, cursor: usize) -> Option<Completion> {
        complete::probe(line, cursor, &self.cache.snapshot())
    }

    /// Post-completion edit.
    pub fn accept(&self, line: &str, cursor: usize, status: ExitStatus) -> Option<TextEdit> {
        complete::accept(line, cursor, status)
    }

    /// The wiki's title.
    pub async fn title(&self) -> Result<String, SessionError> {
        Ok(self.client.title().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentialProvider;
    use crate::remote::mock::MockTransport;
    use crate::remote::RemoteError;

    fn session(mock: &MockTransport, namespace: &str) -> Session {
        let client = WikiClient::new(
            Arc::new(mock.clone()),
            Arc::new(StaticCredentialProvider::new("alice", "secret")),
        );
        Session::new(client, namespace)
    }

    #[tokio::test]
    async fn open_resolves_against_namespace() {
        let mock = MockTransport::new().with_page("projects:notes", "hello");
        let s = session(&mock, "projects");

        let page = s.open("notes", None).await.unwrap();
        assert_eq!(page.id.as_str(), "projects:notes");
        assert_eq!(page.content, "hello");
        assert!(page.exists);

        let other = s.open("notes", Some("elsewhere")).await.unwrap();
        assert_eq!(other.id.as_str(), "elsewhere:notes");
        assert!(!other.exists);
    }

    #[tokio::test]
    async fn absolute_path_opens_existing_page() {
        let mock = MockTransport::new().with_page("proj:notes", "hello");
        let s = session(&mock, "elsewhere");

        let page = s.open(":proj:notes", None).await.unwrap();
        assert_eq!(page.id.as_str(), ":proj:notes");
        assert!(page.exists);
        assert_eq!(page.content, "hello");

        s.save(":proj:notes", None, "edited", SaveRequest::default())
            .await
            .unwrap();
        assert_eq!(mock.page("proj:notes").as_deref(), Some("edited"));
    }

    #[tokio::test]
    async fn invalid_path_never_reaches_the_wire() {
        let mock = MockTransport::new();
        let s = session(&mock, "ns");

        let err = s.open("Foo:bar", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn save_uses_defaults_unless_overridden() {
        let mock = MockTransport::new();
        let s = session(&mock, "ns").with_save_defaults(PutOptions {
            summary: "default".into(),
            minor: true,
        });

        s.save("a", None, "one", SaveRequest::default()).await.unwrap();
        let params = mock.calls().pop().unwrap().params;
        assert_eq!(params[0].as_str(), Some("ns:a"));
        assert_eq!(params[2].get("sum").and_then(|v| v.as_str()), Some("default"));

        s.save(
            "a",
            None,
            "two",
            SaveRequest {
                summary: Some("custom".into()),
                minor: Some(false),
            },
        )
        .await
        .unwrap();
        let params = mock.calls().pop().unwrap().params;
        assert_eq!(params[2].get("sum").and_then(|v| v.as_str()), Some("custom"));
        assert_eq!(mock.page("ns:a").as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn rejected_save_is_an_error() {
        let mock = MockTransport::new();
        mock.reject_saves(true);
        let s = session(&mock, "");

        let err = s.save("a", None, "x", SaveRequest::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteRejection);
    }

    #[tokio::test]
    async fn completion_reads_cache_only() {
        let mock = MockTransport::new()
            .with_page("proj:a", "")
            .with_page("proj:b", "")
            .with_page("top", "");
        let mut s = session(&mock, "");

        assert_eq!(s.complete(":pr", 3).unwrap().candidates.len(), 0);
        assert!(mock.calls().is_empty());

        assert_eq!(
            s.candidates(false).await.unwrap(),
            vec![":proj:a", ":proj:b", ":top"]
        );
        assert_eq!(s.complete(":pr", 3).unwrap().candidates.len(), 3);
        assert_eq!(mock.call_count("wiki.getAllPages"), 1);
    }

    #[tokio::test]
    async fn stale_list_survives_failed_refresh() {
        let mock = MockTransport::new().with_page("a", "");
        let mut s = session(&mock, "");
        s.list(false).await.unwrap();

        mock.fail_next("wiki.getAllPages", RemoteError::Network("down".into()));
        let err = s.list(true).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(s.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn detailed_listing_refreshes_cache() {
        let mock = MockTransport::new().with_page("a", "abc");
        let mut s = session(&mock, "");

        let entries = s.list_detailed().await.unwrap();
        assert_eq!(entries[0].size, Some(3));
        assert_eq!(s.snapshot().len(), 1);
    }

    #[test]
    fn link_validates_id() {
        let mock = MockTransport::new();
        let s = session(&mock, "");
        assert_eq!(s.link("proj:a").unwrap(), "[[:proj:a]]");
        assert_eq!(s.link("has space").unwrap_err().kind(), ErrorKind::InvalidPath);
    }

    #[test]
    fn connect_requires_endpoint() {
        let config = Config::default();
        let err = match Session::connect(&config, false) {
            Err(e) => e,
            Ok(_) => panic!("expected configuration error"),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
