//! session::protocol
//!
//! JSON-lines protocol spoken by `dwiki serve`.
//!
//! # Framing
//!
//! One request object per input line, one response object per output
//! line, in order. Requests are tagged by `op`:
//!
//! ```text
//! {"op":"resolve","path":".:notes","namespace":"proj"}
//! {"op":"open","path":"notes"}
//! {"op":"save","path":"notes","content":"...","summary":"typo","minor":true}
//! {"op":"list","refresh":false}
//! {"op":"candidates","refresh":true}
//! {"op":"link","id":"proj:a"}
//! {"op":"complete","line":"see :pr","cursor":7}
//! {"op":"accept","line":"see :proj:a","cursor":11,"status":"finished"}
//! {"op":"title"}
//! {"op":"shutdown"}
//! ```
//!
//! Responses are `{"ok":true,"result":...}` or
//! `{"ok":false,"error":{"kind":"...","message":"..."}}`.
//!
//! The session lives for the whole loop, so the page cache is shared by
//! every request.

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use super::{ErrorKind, SaveRequest, Session, SessionError};
use crate::complete::ExitStatus;

/// An editor request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    Resolve {
        path: String,
        #[serde(default)]
        namespace: Option<String>,
    },
    Open {
        path: String,
        #[serde(default)]
        namespace: Option<String>,
    },
    Save {
        path: String,
        content: String,
        #[serde(default)]
        namespace: Option<String>,
        #[serde(default)]
        summary: Option<String>,
        #[serde(default)]
        minor: Option<bool>,
    },
    List {
        #[serde(default)]
        refresh: bool,
    },
    Candidates {
        #[serde(default)]
        refresh: bool,
    },
    Link {
        id: String,
    },
    Complete {
        line: String,
        cursor: usize,
    },
    Accept {
        line: String,
        cursor: usize,
        status: ExitStatus,
    },
    Title,
    Shutdown,
}

/// Error payload of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

/// A response line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    /// A successful response.
    pub fn success(result: Json) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    /// A failed response.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(ErrorBody {
                kind,
                message: message.into(),
            }),
        }
    }
}

impl From<SessionError> for Response {
    fn from(err: SessionError) -> Self {
        Response::failure(err.kind(), err.to_string())
    }
}

fn to_json<T: Serialize>(value: T) -> Json {
    // Plain data with string keys; serialization cannot fail.
    serde_json::to_value(value).unwrap_or(Json::Null)
}

/// Execute one request against the session.
pub async fn handle(session: &mut Session, request: Request) -> Response {
    match dispatch(session, request).await {
        Ok(result) => Response::success(result),
        Err(err) => {
            debug!(kind = %err.kind(), error = %err, "request failed");
            err.into()
        }
    }
}

async fn dispatch(session: &mut Session, request: Request) -> Result<Json, SessionError> {
    match request {
        Request::Resolve { path, namespace } => {
            let id = session.resolve(&path, namespace.as_deref())?;
            Ok(json!(id.as_str()))
        }
        Request::Open { path, namespace } => {
            let page = session.open(&path, namespace.as_deref()).await?;
            Ok(to_json(page))
        }
        Request::Save {
            path,
            content,
            namespace,
            summary,
            minor,
        } => {
            let id = session
                .save(&path, namespace.as_deref(), &content, SaveRequest { summary, minor })
                .await?;
            Ok(json!({ "id": id.as_str(), "saved": true }))
        }
        Request::List { refresh } => {
            let pages = session.list(refresh).await?;
            Ok(to_json(pages.as_slice()))
        }
        Request::Candidates { refresh } => Ok(to_json(session.candidates(refresh).await?)),
        Request::Link { id } => Ok(json!(session.link(&id)?)),
        Request::Complete { line, cursor } => Ok(to_json(session.complete(&line, cursor))),
        Request::Accept {
            line,
            cursor,
            status,
        } => Ok(to_json(session.accept(&line, cursor, status))),
        Request::Title => Ok(json!(session.title().await?)),
        Request::Shutdown => Ok(Json::Null),
    }
}

/// Parse one input line.
pub fn parse_request(line: &str) -> Result<Request, Response> {
    serde_json::from_str(line)
        .map_err(|e| Response::failure(ErrorKind::Request, format!("malformed request: {}", e)))
}

/// Run the request loop until `shutdown` or end of input.
///
/// Blank lines are skipped. Each response is flushed as soon as it is
/// written.
pub fn serve<R: BufRead, W: Write>(
    runtime: &Runtime,
    session: &mut Session,
    input: R,
    mut output: W,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (response, stop) = match parse_request(&line) {
            Ok(request) => {
                let stop = request == Request::Shutdown;
                (runtime.block_on(handle(session, request)), stop)
            }
            Err(response) => {
                warn!("ignoring malformed request line");
                (response, false)
            }
        };

        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;

        if stop {
            break;
        }
    }
    Ok(())
}
