//! Just enough HTTP/1.1 to put the delivery pipeline on a socket.

use percent_encoding::percent_decode_str;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("request path is not valid UTF-8: {0}")]
    InvalidPath(#[from] std::str::Utf8Error),

    #[error("connection closed before request was complete")]
    UnexpectedEof,

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: String,
    /// Percent-decoded path, without the query string.
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// Builds a GET request from a raw target, split and decoded the same way
    /// as [`read_request`].
    pub fn get(target: &str) -> Self {
        let (path, query) = split_target(target);
        Self {
            method: "GET".to_string(),
            path: percent_decode_str(path).decode_utf8_lossy().into_owned(),
            query: query.map(str::to_string),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        let mut response = Self::new(200);
        response.set_header("Content-Type", content_type);
        response.body = body;
        response
    }

    pub fn not_found() -> Self {
        Self::new(404)
    }

    pub fn text(status: u16, text: &str) -> Self {
        let mut response = Self::new(status);
        response.set_header("Content-Type", "text/plain");
        response.set_header("Content-Length", &text.len().to_string());
        response.body = text.as_bytes().to_vec();
        response
    }

    /// Replaces any existing header with the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request) -> Response;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    fn handle(&self, request: &Request) -> Response {
        self(request)
    }
}

pub type BoxHandler = Arc<dyn Handler>;

/// Wraps a handler, deciding per request whether to answer or call `next`.
pub trait Middleware {
    fn wrap(&self, next: BoxHandler) -> BoxHandler;
}

fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// Reads the request line and headers. The body, if any, is left unread.
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Request, HttpError> {
    let mut first_line = String::new();
    if reader.read_line(&mut first_line)? == 0 {
        return Err(HttpError::UnexpectedEof);
    }

    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(HttpError::MalformedRequestLine(first_line.trim().to_string()));
    }
    let (raw_path, query) = split_target(parts[1]);
    let path = percent_decode_str(raw_path).decode_utf8()?.into_owned();

    let mut headers = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(HttpError::UnexpectedEof);
        }
        if line.trim().is_empty() {
            break;
        }
        log::trace!("Header line: {}", line.trim());
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    Ok(Request {
        method: parts[0].to_string(),
        path,
        query: query.map(str::to_string),
        headers,
    })
}

pub fn write_response<W: Write>(
    writer: &mut W,
    response: &Response,
    include_body: bool,
) -> io::Result<()> {
    write!(
        writer,
        "HTTP/1.1 {} {}\r\n",
        response.status,
        reason_phrase(response.status)
    )?;
    for (key, value) in &response.headers {
        write!(writer, "{}: {}\r\n", key, value)?;
    }
    if response.header("Content-Length").is_none() {
        write!(writer, "Content-Length: {}\r\n", response.body.len())?;
    }
    writer.write_all(b"Connection: close\r\n\r\n")?;
    if include_body {
        writer.write_all(&response.body)?;
    }
    writer.flush()
}
