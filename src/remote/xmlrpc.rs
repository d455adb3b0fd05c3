//! remote::xmlrpc
//!
//! XML-RPC value model and wire codec.
//!
//! # Design
//!
//! Encoding writes a `methodCall` document directly. Decoding flattens the
//! `methodResponse` document into a token stream with `quick-xml` and then
//! walks it with a small recursive-descent parser, which keeps the handling
//! of untyped `<value>text</value>` and interleaved whitespace in one place.
//!
//! # Example
//!
//! ```
//! use dwiki::remote::xmlrpc::{encode_call, parse_response, Value};
//!
//! let body = encode_call("wiki.getPage", &[Value::from("start")]);
//! assert!(body.contains("<methodName>wiki.getPage</methodName>"));
//!
//! let response = "<?xml version=\"1.0\"?><methodResponse><params><param>\
//!     <value><string>hello</string></value></param></params></methodResponse>";
//! assert_eq!(parse_response(response).unwrap(), Value::from("hello"));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::traits::RemoteError;

/// An XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    /// `dateTime.iso8601`, kept as sent (DokuWiki uses `YYYYMMDDTHH:MM:SS`).
    DateTime(String),
    /// `base64`, kept encoded.
    Base64(String),
    Array(Vec<Value>),
    Struct(BTreeMap<String, Value>),
    Nil,
}

impl Value {
    /// Borrow the string content of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content of an `Int` value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the elements of an `Array` value.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a member of a `Struct` value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.get(key),
            _ => None,
        }
    }

    /// XML-RPC truthiness as servers use it for status results.
    ///
    /// `false`, `0`, `""`, nil and empty collections are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Double(d) => *d != 0.0,
            Value::String(s) | Value::DateTime(s) | Value::Base64(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Struct(members) => !members.is_empty(),
            Value::Nil => false,
        }
    }

    /// Build a struct value from key/value pairs.
    pub fn structure<I, K>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

// --------------------------------------------------------------------------
// Encoding
// --------------------------------------------------------------------------

/// Encode a `methodCall` document with positional parameters.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?><methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        write_value(&mut out, param);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

fn write_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(n) => {
            let _ = write!(out, "<int>{}</int>", n);
        }
        Value::Bool(b) => {
            let _ = write!(out, "<boolean>{}</boolean>", u8::from(*b));
        }
        Value::String(s) => {
            let _ = write!(out, "<string>{}</string>", escape(s.as_str()));
        }
        Value::Double(d) => {
            let _ = write!(out, "<double>{}</double>", d);
        }
        Value::DateTime(s) => {
            let _ = write!(out, "<dateTime.iso8601>{}</dateTime.iso8601>", escape(s.as_str()));
        }
        Value::Base64(s) => {
            let _ = write!(out, "<base64>{}</base64>", escape(s.as_str()));
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                let _ = write!(out, "<member><name>{}</name>", escape(name.as_str()));
                write_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

// --------------------------------------------------------------------------
// Decoding
// --------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open(String),
    Close(String),
    Text(String),
}

fn decode_err(message: impl Into<String>) -> RemoteError {
    RemoteError::Decode(message.into())
}

fn tag_name(raw: &[u8]) -> Result<String, RemoteError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|_| decode_err("tag name is not UTF-8"))
}

fn push_text(tokens: &mut Vec<Token>, text: String) {
    if let Some(Token::Text(prev)) = tokens.last_mut() {
        prev.push_str(&text);
    } else {
        tokens.push(Token::Text(text));
    }
}

/// Flatten the document into open/close/text tokens.
///
/// Self-closing tags become an open/close pair; adjacent text and CDATA
/// sections are merged.
fn tokenize(xml: &str) -> Result<Vec<Token>, RemoteError> {
    let mut reader = Reader::from_str(xml);
    let mut tokens = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => tokens.push(Token::Open(tag_name(e.name().as_ref())?)),
            Ok(Event::End(e)) => tokens.push(Token::Close(tag_name(e.name().as_ref())?)),
            Ok(Event::Empty(e)) => {
                let name = tag_name(e.name().as_ref())?;
                tokens.push(Token::Open(name.clone()));
                tokens.push(Token::Close(name));
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| decode_err(format!("bad text content: {}", e)))?;
                push_text(&mut tokens, text.into_owned());
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                let text = String::from_utf8(raw.into_owned())
                    .map_err(|_| decode_err("CDATA is not UTF-8"))?;
                push_text(&mut tokens, text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(decode_err(format!("invalid XML: {}", e))),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn skip_ws(&mut self) {
        while let Some(Token::Text(t)) = self.peek() {
            if !t.trim().is_empty() {
                break;
            }
            self.pos += 1;
        }
    }

    fn expect_open(&mut self, name: &str) -> Result<(), RemoteError> {
        self.skip_ws();
        match self.next() {
            Some(Token::Open(n)) if n == name => Ok(()),
            other => Err(decode_err(format!("expected <{}>, found {:?}", name, other))),
        }
    }

    fn expect_close(&mut self, name: &str) -> Result<(), RemoteError> {
        self.skip_ws();
        match self.next() {
            Some(Token::Close(n)) if n == name => Ok(()),
            other => Err(decode_err(format!("expected </{}>, found {:?}", name, other))),
        }
    }

    fn at_close(&mut self, name: &str) -> bool {
        self.skip_ws();
        matches!(self.peek(), Some(Token::Close(n)) if n == name)
    }

    /// Text content up to the closing tag; whitespace is preserved.
    fn text_until(&mut self, name: &str) -> Result<String, RemoteError> {
        let text = match self.peek() {
            Some(Token::Text(t)) => {
                let t = t.clone();
                self.pos += 1;
                t
            }
            _ => String::new(),
        };
        match self.next() {
            Some(Token::Close(n)) if n == name => Ok(text),
            other => Err(decode_err(format!("expected </{}>, found {:?}", name, other))),
        }
    }

    fn value(&mut self) -> Result<Value, RemoteError> {
        self.expect_open("value")?;

        // Untyped value: <value>text</value> or <value></value>
        match (self.peek(), self.peek_at(1)) {
            (Some(Token::Close(n)), _) if n == "value" => {
                self.pos += 1;
                return Ok(Value::String(String::new()));
            }
            (Some(Token::Text(t)), Some(Token::Close(n))) if n == "value" => {
                let text = t.clone();
                self.pos += 2;
                return Ok(Value::String(text));
            }
            _ => {}
        }

        self.skip_ws();
        let tag = match self.next() {
            Some(Token::Open(tag)) => tag,
            other => return Err(decode_err(format!("expected value type, found {:?}", other))),
        };

        let value = match tag.as_str() {
            "int" | "i4" | "i8" => {
                let text = self.text_until(&tag)?;
                Value::Int(
                    text.trim()
                        .parse()
                        .map_err(|_| decode_err(format!("bad integer '{}'", text)))?,
                )
            }
            "boolean" => {
                let text = self.text_until(&tag)?;
                match text.trim() {
                    "1" | "true" => Value::Bool(true),
                    "0" | "false" => Value::Bool(false),
                    other => return Err(decode_err(format!("bad boolean '{}'", other))),
                }
            }
            "double" => {
                let text = self.text_until(&tag)?;
                Value::Double(
                    text.trim()
                        .parse()
                        .map_err(|_| decode_err(format!("bad double '{}'", text)))?,
                )
            }
            "string" => Value::String(self.text_until(&tag)?),
            "dateTime.iso8601" => Value::DateTime(self.text_until(&tag)?.trim().to_string()),
            "base64" => Value::Base64(self.text_until(&tag)?.trim().to_string()),
            "nil" => {
                self.expect_close("nil")?;
                Value::Nil
            }
            "array" => self.array()?,
            "struct" => self.structure()?,
            other => return Err(decode_err(format!("unknown value type <{}>", other))),
        };

        self.expect_close("value")?;
        Ok(value)
    }

    fn array(&mut self) -> Result<Value, RemoteError> {
        self.expect_open("data")?;
        let mut items = Vec::new();
        while !self.at_close("data") {
            items.push(self.value()?);
        }
        self.expect_close("data")?;
        self.expect_close("array")?;
        Ok(Value::Array(items))
    }

    fn structure(&mut self) -> Result<Value, RemoteError> {
        let mut members = BTreeMap::new();
        while !self.at_close("struct") {
            self.expect_open("member")?;
            self.expect_open("name")?;
            let name = self.text_until("name")?;
            let value = self.value()?;
            self.expect_close("member")?;
            members.insert(name, value);
        }
        self.expect_close("struct")?;
        Ok(Value::Struct(members))
    }

    fn response(&mut self) -> Result<Value, RemoteError> {
        self.expect_open("methodResponse")?;
        self.skip_ws();
        let result = match self.next() {
            Some(Token::Open(tag)) if tag == "params" => {
                let value = if self.at_close("params") {
                    Value::Nil
                } else {
                    self.expect_open("param")?;
                    let value = self.value()?;
                    self.expect_close("param")?;
                    value
                };
                self.expect_close("params")?;
                Ok(value)
            }
            Some(Token::Open(tag)) if tag == "fault" => {
                let fault = self.value()?;
                self.expect_close("fault")?;
                Err(fault_error(&fault))
            }
            other => Err(decode_err(format!(
                "expected <params> or <fault>, found {:?}",
                other
            ))),
        };
        if result.is_ok() {
            self.expect_close("methodResponse")?;
        }
        result
    }
}

fn fault_error(fault: &Value) -> RemoteError {
    let code = fault.get("faultCode").and_then(Value::as_i64).unwrap_or(0);
    let message = fault
        .get("faultString")
        .and_then(Value::as_str)
        .unwrap_or("unknown fault")
        .to_string();
    RemoteError::Fault { code, message }
}

/// Decode a `methodResponse` document.
///
/// # Errors
///
/// - `RemoteError::Fault` when the server answered with a `<fault>`
/// - `RemoteError::Decode` when the document is not a valid response
pub fn parse_response(xml: &str) -> Result<Value, RemoteError> {
    let tokens = tokenize(xml)?;
    Parser { tokens, pos: 0 }.response()
}
