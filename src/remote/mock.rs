//! remote::mock
//!
//! In-memory DokuWiki for deterministic testing.
//!
//! # Design
//!
//! [`MockTransport`] answers the same XML-RPC methods a DokuWiki server
//! does, keeps pages in memory and records every call. Tests can require
//! a login, expire the session, make saves fail, or inject a one-off
//! failure for a specific method.
//!
//! # Example
//!
//! ```
//! use dwiki::remote::mock::MockTransport;
//! use dwiki::remote::{Transport, Value};
//!
//! # tokio_test::block_on(async {
//! let wiki = MockTransport::new().with_page("start", "Hello");
//!
//! let value = wiki.call("wiki.getPage", &[Value::from("start")]).await.unwrap();
//! assert_eq!(value.as_str(), Some("Hello"));
//! assert_eq!(wiki.call_count("wiki.getPage"), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{RemoteError, Transport};
use super::xmlrpc::Value;
use crate::auth::Site;

/// Mock wiki endpoint.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug)]
struct MockInner {
    site: Site,
    title: String,
    version: String,
    /// Page id -> content.
    pages: BTreeMap<String, String>,
    /// Whether calls other than login need a logged-in session.
    require_login: bool,
    logged_in: bool,
    /// Accepted user/password pair.
    account: (String, String),
    /// Whether putPage answers false.
    reject_saves: bool,
    /// One-shot failures keyed by method name.
    fail_next: HashMap<String, Vec<RemoteError>>,
    /// Recorded calls for verification.
    calls: Vec<MockCall>,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    /// Method name
    pub method: String,
    /// Positional arguments
    pub params: Vec<Value>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create an empty wiki that does not require a login.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                site: Site::new("wiki.test", 443),
                title: "Test Wiki".to_string(),
                version: "Release 2024-02-06 \"Kaos\"".to_string(),
                pages: BTreeMap::new(),
                require_login: false,
                logged_in: false,
                account: ("alice".to_string(), "secret".to_string()),
                reject_saves: false,
                fail_next: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockInner> {
        // A panicking test thread must not poison every later assertion.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a page.
    pub fn with_page(self, id: &str, content: &str) -> Self {
        self.lock()
            .pages
            .insert(clean_id(id).to_string(), content.to_string());
        self
    }

    /// Require a login before any call but `dokuwiki.login` succeeds.
    ///
    /// Unauthenticated calls fail with HTTP 401.
    pub fn require_login(self, user: &str, password: &str) -> Self {
        {
            let mut inner = self.lock();
            inner.require_login = true;
            inner.account = (user.to_string(), password.to_string());
        }
        self
    }

    /// Set the wiki title.
    pub fn with_title(self, title: &str) -> Self {
        self.lock().title = title.to_string();
        self
    }

    /// Make `wiki.putPage` answer false.
    pub fn reject_saves(&self, reject: bool) {
        self.lock().reject_saves = reject;
    }

    /// Drop the logged-in session.
    pub fn expire_session(&self) {
        self.lock().logged_in = false;
    }

    /// Fail the next call to `method` with `err`. Queued failures are
    /// consumed in order.
    pub fn fail_next(&self, method: &str, err: RemoteError) {
        self.lock()
            .fail_next
            .entry(method.to_string())
            .or_default()
            .push(err);
    }

    /// Add or replace a page behind the client's back.
    pub fn insert_page(&self, id: &str, content: &str) {
        self.lock()
            .pages
            .insert(clean_id(id).to_string(), content.to_string());
    }

    /// Current content of a page.
    pub fn page(&self, id: &str) -> Option<String> {
        self.lock().pages.get(clean_id(id)).cloned()
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls to `method`.
    pub fn call_count(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.method == method).count()
    }

    /// Recorded method names in call order.
    pub fn methods(&self) -> Vec<String> {
        self.lock().calls.iter().map(|c| c.method.clone()).collect()
    }

    /// Clear recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

/// Server-side id normalization: DokuWiki stores `:a:b` as `a:b`.
fn clean_id(id: &str) -> &str {
    id.trim_start_matches(':')
}

fn str_param<'a>(params: &'a [Value], index: usize, method: &str) -> Result<&'a str, RemoteError> {
    params
        .get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| RemoteError::Fault {
            code: -32602,
            message: format!("{}: missing string parameter {}", method, index),
        })
}

#[async_trait]
impl Transport for MockTransport {
    fn site(&self) -> Site {
        self.lock().site.clone()
    }

    async fn call(&self, method: &str, params: &[Value]) -> Result<Value, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(MockCall {
            method: method.to_string(),
            params: params.to_vec(),
        });

        if let Some(queue) = inner.fail_next.get_mut(method) {
            if !queue.is_empty() {
                return Err(queue.remove(0));
            }
        }

        if method == "dokuwiki.login" {
            let user = str_param(params, 0, method)?;
            let password = str_param(params, 1, method)?;
            let ok = user == inner.account.0 && password == inner.account.1;
            inner.logged_in = ok;
            return Ok(Value::Bool(ok));
        }

        if inner.require_login && !inner.logged_in {
            return Err(RemoteError::Unauthorized("HTTP 401 from mock".into()));
        }

        match method {
            "dokuwiki.getTitle" => Ok(Value::from(inner.title.clone())),
            "dokuwiki.getVersion" => Ok(Value::from(inner.version.clone())),
            "wiki.getPage" => {
                let id = clean_id(str_param(params, 0, method)?);
                // DokuWiki answers an empty string for pages that do not exist.
                Ok(Value::from(inner.pages.get(id).cloned().unwrap_or_default()))
            }
            "wiki.putPage" => {
                let id = clean_id(str_param(params, 0, method)?).to_string();
                let content = str_param(params, 1, method)?.to_string();
                if inner.reject_saves {
                    return Ok(Value::Bool(false));
                }
                inner.pages.insert(id, content);
                Ok(Value::Bool(true))
            }
            "wiki.getAllPages" => {
                let list = inner
                    .pages
                    .iter()
                    .map(|(id, content)| {
                        Value::structure([
                            ("id", Value::from(id.as_str())),
                            ("size", Value::Int(content.len() as i64)),
                            ("lastModified", Value::DateTime("20240101T12:00:00".into())),
                        ])
                    })
                    .collect::<Vec<_>>();
                Ok(Value::Array(list))
            }
            other => Err(RemoteError::Fault {
                code: -32601,
                message: format!("requested method {} not found", other),
            }),
        }
    }
}
