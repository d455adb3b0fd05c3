//! remote::client
//!
//! Typed DokuWiki operations with login-and-retry-once.
//!
//! # Recovery policy
//!
//! Every operation except [`WikiClient::login`] goes through one wrapper:
//!
//! 1. Call with the current session state. No pre-emptive login.
//! 2. On an authorization failure (see
//!    [`RemoteError::is_authorization_failure`]) obtain credentials from the
//!    provider, falling back to the prompt, and log in.
//! 3. On a truthy login, retry the original call exactly once. Whatever the
//!    retry returns is final.
//!
//! Any other failure propagates untouched, with no login attempt. A refused
//! login is [`RemoteError::Authentication`].

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::traits::{RemoteError, Transport};
use super::xmlrpc::Value;
use crate::auth::{AuthError, CredentialPrompt, CredentialProvider, Credentials, Site};
use crate::core::types::PageId;

/// The remote methods this client calls. A closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMethod {
    Login,
    GetTitle,
    GetVersion,
    GetPage,
    PutPage,
    GetAllPages,
}

impl RemoteMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteMethod::Login => "dokuwiki.login",
            RemoteMethod::GetTitle => "dokuwiki.getTitle",
            RemoteMethod::GetVersion => "dokuwiki.getVersion",
            RemoteMethod::GetPage => "wiki.getPage",
            RemoteMethod::PutPage => "wiki.putPage",
            RemoteMethod::GetAllPages => "wiki.getAllPages",
        }
    }
}

impl fmt::Display for RemoteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for saving a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// Edit summary
    pub summary: String,
    /// Mark as a minor edit
    pub minor: bool,
}

/// One entry of the page listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    /// Page identifier
    pub id: PageId,
    /// Size in bytes, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Last modification time, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// DokuWiki's `dateTime.iso8601` layout.
const DOKUWIKI_TIMESTAMP: &str = "%Y%m%dT%H:%M:%S";

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::DateTime(text) | Value::String(text) => {
            NaiveDateTime::parse_from_str(text, DOKUWIKI_TIMESTAMP)
                .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
                .ok()
                .map(|naive| naive.and_utc())
        }
        Value::Int(secs) => Utc.timestamp_opt(*secs, 0).single(),
        _ => None,
    }
}

fn page_info(entry: &Value) -> Result<PageInfo, RemoteError> {
    let id = entry
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| RemoteError::Decode("page entry without an id".into()))?;
    let id = PageId::new(id).map_err(|e| RemoteError::Decode(e.to_string()))?;

    Ok(PageInfo {
        id,
        size: entry.get("size").and_then(Value::as_i64),
        last_modified: entry.get("lastModified").and_then(parse_timestamp),
    })
}

/// Client for a DokuWiki XML-RPC endpoint.
pub struct WikiClient {
    transport: Arc<dyn Transport>,
    provider: Arc<dyn CredentialProvider>,
    prompt: Option<Arc<dyn CredentialPrompt>>,
}

impl WikiClient {
    /// Create a client over a transport and a credential provider.
    pub fn new(transport: Arc<dyn Transport>, provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            transport,
            provider,
            prompt: None,
        }
    }

    /// Ask this prompt when the provider has nothing stored.
    pub fn with_prompt(mut self, prompt: Arc<dyn CredentialPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// The site this client talks to.
    pub fn site(&self) -> Site {
        self.transport.site()
    }

    fn credentials(&self, site: &Site) -> Result<Credentials, AuthError> {
        if let Some(credentials) = self.provider.lookup(site)? {
            debug!(site = %site, principal = credentials.principal(), "using stored credentials");
            return Ok(credentials);
        }
        match &self.prompt {
            Some(prompt) => prompt.prompt(site),
            None => Err(AuthError::NoCredentials(site.to_string())),
        }
    }

    async fn call(&self, method: RemoteMethod, params: &[Value]) -> Result<Value, RemoteError> {
        debug!(method = method.as_str(), "remote call");

        let err = match self.transport.call(method.as_str(), params).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !err.is_authorization_failure() {
            return Err(err);
        }

        let site = self.site();
        info!(site = %site, method = method.as_str(), "session not authorized, logging in");

        let credentials = self.credentials(&site)?;
        if !self.login(credentials).await? {
            return Err(RemoteError::Authentication(format!(
                "login to {} was refused",
                site
            )));
        }

        debug!(method = method.as_str(), "retrying after login");
        self.transport.call(method.as_str(), params).await
    }

    /// Log in. Never retried and never triggers a nested login.
    ///
    /// Returns the server's verdict; a successful login is kept by the
    /// transport's session for later calls.
    pub async fn login(&self, credentials: Credentials) -> Result<bool, RemoteError> {
        let (principal, secret) = credentials.into_parts()?;
        let result = self
            .transport
            .call(
                RemoteMethod::Login.as_str(),
                &[Value::from(principal), Value::from(secret)],
            )
            .await?;
        Ok(result.is_truthy())
    }

    /// The wiki's title.
    pub async fn title(&self) -> Result<String, RemoteError> {
        let value = self.call(RemoteMethod::GetTitle, &[]).await?;
        expect_string(value, RemoteMethod::GetTitle)
    }

    /// The server's DokuWiki version string.
    pub async fn version(&self) -> Result<String, RemoteError> {
        let value = self.call(RemoteMethod::GetVersion, &[]).await?;
        expect_string(value, RemoteMethod::GetVersion)
    }

    /// Raw content of a page, or `None` when the page does not exist.
    pub async fn get_page(&self, id: &PageId) -> Result<Option<String>, RemoteError> {
        let value = self
            .call(RemoteMethod::GetPage, &[Value::from(id.as_str())])
            .await?;
        let content = expect_string(value, RemoteMethod::GetPage)?;
        Ok(if content.is_empty() { None } else { Some(content) })
    }

    /// Save a page. A falsy result is [`RemoteError::Rejected`].
    pub async fn put_page(
        &self,
        id: &PageId,
        content: &str,
        options: &PutOptions,
    ) -> Result<(), RemoteError> {
        let params = [
            Value::from(id.as_str()),
            Value::from(content),
            Value::structure([
                ("sum", Value::from(options.summary.as_str())),
                ("minor", Value::from(options.minor)),
            ]),
        ];
        let result = self.call(RemoteMethod::PutPage, &params).await?;
        if result.is_truthy() {
            Ok(())
        } else {
            Err(RemoteError::Rejected(format!("save of '{}' was refused", id)))
        }
    }

    /// Every page on the wiki, in server order.
    pub async fn all_pages(&self) -> Result<Vec<PageInfo>, RemoteError> {
        let value = self.call(RemoteMethod::GetAllPages, &[]).await?;
        let entries = value.as_array().ok_or_else(|| {
            RemoteError::Decode(format!("{} did not return an array", RemoteMethod::GetAllPages))
        })?;
        entries.iter().map(page_info).collect()
    }
}

fn expect_string(value: Value, method: RemoteMethod) -> Result<String, RemoteError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(RemoteError::Decode(format!(
            "{} returned {:?}, expected a string",
            method, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{NoCredentials, StaticCredentialProvider};
    use crate::remote::mock::MockTransport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client(mock: &MockTransport, user: &str, password: &str) -> WikiClient {
        WikiClient::new(
            Arc::new(mock.clone()),
            Arc::new(StaticCredentialProvider::new(user, password)),
        )
    }

    fn page(id: &str) -> PageId {
        PageId::new(id).unwrap()
    }

    struct CountingPrompt {
        asked: AtomicUsize,
    }

    impl CredentialPrompt for CountingPrompt {
        fn prompt(&self, _site: &Site) -> Result<Credentials, AuthError> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            Ok(Credentials::plain("alice", "secret"))
        }
    }

    #[tokio::test]
    async fn authorized_call_does_not_log_in() {
        let mock = MockTransport::new().with_page("start", "hi");
        let c = client(&mock, "alice", "secret");

        assert_eq!(c.get_page(&page("start")).await.unwrap().as_deref(), Some("hi"));
        assert_eq!(mock.methods(), vec!["wiki.getPage"]);
    }

    #[tokio::test]
    async fn unauthorized_triggers_one_login_and_one_retry() {
        let mock = MockTransport::new()
            .with_page("start", "hi")
            .require_login("alice", "secret");
        let c = client(&mock, "alice", "secret");

        assert_eq!(c.get_page(&page("start")).await.unwrap().as_deref(), Some("hi"));
        assert_eq!(
            mock.methods(),
            vec!["wiki.getPage", "dokuwiki.login", "wiki.getPage"]
        );

        // Session is kept: the next call goes straight through.
        mock.clear_calls();
        c.title().await.unwrap();
        assert_eq!(mock.methods(), vec!["dokuwiki.getTitle"]);
    }

    #[tokio::test]
    async fn fault_text_counts_as_unauthorized() {
        let mock = MockTransport::new().with_title("Docs");
        mock.fail_next(
            "dokuwiki.getTitle",
            RemoteError::Fault {
                code: -32603,
                message: "You are not logged in".into(),
            },
        );
        let c = client(&mock, "alice", "secret");

        assert_eq!(c.title().await.unwrap(), "Docs");
        assert_eq!(mock.call_count("dokuwiki.login"), 1);
        assert_eq!(mock.call_count("dokuwiki.getTitle"), 2);
    }

    #[tokio::test]
    async fn other_errors_skip_login() {
        let mock = MockTransport::new();
        let c = client(&mock, "alice", "secret");

        mock.fail_next("wiki.getPage", RemoteError::Network("unauthorized proxy".into()));
        let err = c.get_page(&page("x")).await.unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)));

        mock.fail_next(
            "wiki.getPage",
            RemoteError::Fault {
                code: 423,
                message: "The page is currently locked".into(),
            },
        );
        let err = c.get_page(&page("x")).await.unwrap_err();
        assert!(matches!(err, RemoteError::Fault { code: 423, .. }));

        assert_eq!(mock.call_count("dokuwiki.login"), 0);
        assert_eq!(mock.call_count("wiki.getPage"), 2);
    }

    #[tokio::test]
    async fn refused_login_does_not_retry() {
        let mock = MockTransport::new().require_login("alice", "secret");
        let c = client(&mock, "alice", "wrong");

        let err = c.title().await.unwrap_err();
        assert!(matches!(err, RemoteError::Authentication(_)));
        assert_eq!(mock.methods(), vec!["dokuwiki.getTitle", "dokuwiki.login"]);
    }

    #[tokio::test]
    async fn failed_retry_propagates_without_looping() {
        let mock = MockTransport::new();
        mock.fail_next("dokuwiki.getTitle", RemoteError::Unauthorized("401".into()));
        mock.fail_next("dokuwiki.getTitle", RemoteError::Unauthorized("401".into()));
        let c = client(&mock, "alice", "secret");

        let err = c.title().await.unwrap_err();
        assert!(matches!(err, RemoteError::Unauthorized(_)));
        assert_eq!(mock.call_count("dokuwiki.login"), 1);
        assert_eq!(mock.call_count("dokuwiki.getTitle"), 2);
    }

    #[tokio::test]
    async fn falls_back_to_prompt() {
        let mock = MockTransport::new().require_login("alice", "secret");
        let prompt = Arc::new(CountingPrompt {
            asked: AtomicUsize::new(0),
        });
        let c = WikiClient::new(Arc::new(mock.clone()), Arc::new(NoCredentials))
            .with_prompt(prompt.clone());

        c.title().await.unwrap();
        assert_eq!(prompt.asked.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_credentials_anywhere_is_authentication_error() {
        let mock = MockTransport::new().require_login("alice", "secret");
        let c = WikiClient::new(Arc::new(mock.clone()), Arc::new(NoCredentials));

        let err = c.title().await.unwrap_err();
        assert!(matches!(err, RemoteError::Authentication(_)));
        assert_eq!(mock.call_count("dokuwiki.login"), 0);
    }

    #[tokio::test]
    async fn login_is_raw() {
        let mock = MockTransport::new().require_login("alice", "secret");
        let c = client(&mock, "alice", "secret");

        assert!(!c.login(Credentials::plain("alice", "nope")).await.unwrap());
        assert!(c.login(Credentials::plain("alice", "secret")).await.unwrap());
        assert_eq!(mock.methods(), vec!["dokuwiki.login", "dokuwiki.login"]);
    }

    #[tokio::test]
    async fn missing_page_is_none() {
        let mock = MockTransport::new();
        let c = client(&mock, "alice", "secret");
        assert_eq!(c.get_page(&page("ghost")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_page_sends_options() {
        let mock = MockTransport::new();
        let c = client(&mock, "alice", "secret");
        let options = PutOptions {
            summary: "typo".into(),
            minor: true,
        };

        c.put_page(&page("a:b"), "body", &options).await.unwrap();
        assert_eq!(mock.page("a:b").as_deref(), Some("body"));

        let call = mock.calls().pop().unwrap();
        assert_eq!(call.method, "wiki.putPage");
        assert_eq!(
            call.params[2],
            Value::structure([("sum", Value::from("typo")), ("minor", Value::from(true))])
        );
    }

    #[tokio::test]
    async fn falsy_put_is_rejected() {
        let mock = MockTransport::new();
        mock.reject_saves(true);
        let c = client(&mock, "alice", "secret");

        let err = c
            .put_page(&page("a"), "body", &PutOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Rejected(_)));
        assert_eq!(mock.call_count("dokuwiki.login"), 0);
    }

    #[tokio::test]
    async fn all_pages_decodes_entries() {
        let mock = MockTransport::new()
            .with_page("proj:a", "12345")
            .with_page("top", "");
        let c = client(&mock, "alice", "secret");

        let pages = c.all_pages().await.unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].id.as_str(), "proj:a");
        assert_eq!(pages[0].size, Some(5));
        assert_eq!(
            pages[0].last_modified,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn entry_without_id_is_decode_error() {
        let entry = Value::structure([("size", Value::Int(3))]);
        assert!(matches!(page_info(&entry), Err(RemoteError::Decode(_))));
    }

    #[test]
    fn timestamps() {
        assert_eq!(
            parse_timestamp(&Value::Int(0)),
            Some(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(parse_timestamp(&Value::from("yesterday")).is_none());
    }

    #[test]
    fn method_names() {
        assert_eq!(RemoteMethod::Login.as_str(), "dokuwiki.login");
        assert_eq!(RemoteMethod::GetAllPages.to_string(), "wiki.getAllPages");
    }
}
