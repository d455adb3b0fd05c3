//! remote::http
//!
//! XML-RPC transport over HTTP using reqwest.
//!
//! # Session
//!
//! DokuWiki keeps the login in a session cookie. The client is built with a
//! cookie store, so a successful `dokuwiki.login` is honored by every later
//! call made through the same transport.
//!
//! # Authentication
//!
//! The transport never answers an HTTP authentication challenge itself: a
//! 401 is returned as [`RemoteError::Unauthorized`] and the
//! [`WikiClient`](super::WikiClient) decides whether to log in.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode, Url};
use tracing::trace;

use super::traits::{RemoteError, Transport};
use super::xmlrpc::{encode_call, parse_response, Value};
use crate::auth::Site;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("dwiki/", env!("CARGO_PKG_VERSION"));

/// HTTP transport for a single XML-RPC endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
    site: Site,
}

impl HttpTransport {
    /// Create a transport for the endpoint URL.
    ///
    /// # Errors
    ///
    /// - `Network` if the HTTP client cannot be built
    /// - `Http` with status 0 if the URL has no host
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let site = Site::from_url(&url).ok_or_else(|| RemoteError::Http {
            status: 0,
            message: format!("endpoint '{}' has no host", url),
        })?;

        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT_VALUE);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(Self { client, url, site })
    }

    /// The endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn site(&self) -> Site {
        self.site.clone()
    }

    async fn call(&self, method: &str, params: &[Value]) -> Result<Value, RemoteError> {
        let body = encode_call(method, params);

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        trace!(method, status = status.as_u16(), "xml-rpc response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(RemoteError::Unauthorized(format!(
                "HTTP 401 from {}",
                self.site
            )));
        }
        if !status.is_success() {
            return Err(RemoteError::Http {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        parse_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ok_body(value_xml: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?><methodResponse><params><param>{}</param></params></methodResponse>",
            value_xml
        )
    }

    async fn transport(server: &MockServer) -> HttpTransport {
        let url = Url::parse(&format!("{}/lib/exe/xmlrpc.php", server.uri())).unwrap();
        HttpTransport::new(url, Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn posts_xml_and_decodes_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/lib/exe/xmlrpc.php"))
            .and(header("content-type", "text/xml"))
            .and(body_string_contains("<methodName>dokuwiki.getTitle</methodName>"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(ok_body("<value><string>My Wiki</string></value>")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let t = transport(&server).await;
        let value = t.call("dokuwiki.getTitle", &[]).await.unwrap();
        assert_eq!(value, Value::from("My Wiki"));
    }

    #[tokio::test]
    async fn status_401_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = transport(&server)
            .await
            .call("wiki.getPage", &[Value::from("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Unauthorized(_)));
        assert!(err.is_authorization_failure());
    }

    #[tokio::test]
    async fn other_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = transport(&server).await.call("wiki.getPage", &[]).await.unwrap_err();
        assert!(matches!(err, RemoteError::Http { status: 503, .. }));
        assert!(!err.is_authorization_failure());
    }

    #[tokio::test]
    async fn session_cookie_is_replayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("dokuwiki.login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "DokuWiki=abc123; Path=/")
                    .set_body_string(ok_body("<value><boolean>1</boolean></value>")),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("dokuwiki.getTitle"))
            .and(header("cookie", "DokuWiki=abc123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(ok_body("<value>wiki</value>")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let t = transport(&server).await;
        let logged_in = t
            .call("dokuwiki.login", &[Value::from("u"), Value::from("p")])
            .await
            .unwrap();
        assert!(logged_in.is_truthy());
        assert_eq!(t.call("dokuwiki.getTitle", &[]).await.unwrap(), Value::from("wiki"));
    }

    #[tokio::test]
    async fn connection_failure_is_network_error() {
        let url = Url::parse("http://127.0.0.1:9/lib/exe/xmlrpc.php").unwrap();
        let t = HttpTransport::new(url, Some(Duration::from_secs(2))).unwrap();
        let err = t.call("dokuwiki.getTitle", &[]).await.unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)));
    }

    #[test]
    fn site_derived_from_url() {
        let url = Url::parse("https://wiki.example.com/lib/exe/xmlrpc.php").unwrap();
        let t = HttpTransport::new(url, None).unwrap();
        assert_eq!(t.site(), Site::new("wiki.example.com", 443));
    }
}
