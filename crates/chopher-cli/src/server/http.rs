//! Minimal HTTP/1.1 framing.
//!
//! One request per connection: the head is read up to [`MAX_HEADER_BYTES`],
//! the body is read by `Content-Length` up to [`MAX_BODY_BYTES`], and every
//! response carries `Connection: close`.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest accepted request head (request line plus headers).
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

const CONTINUE: &[u8] = b"HTTP/1.1 100 Continue\r\n\r\n";

/// Errors raised while reading a request.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request could not be parsed.
    #[error("malformed request: {0}")]
    BadRequest(String),

    /// The head or body exceeds its limit.
    #[error("{0}")]
    TooLarge(String),

    /// The peer closed the connection before a full request arrived.
    #[error("connection closed before a full request arrived")]
    Incomplete,

    /// I/O error on the socket.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    /// Request target without the query string.
    pub path: String,
    pub query: Option<String>,
    /// Header names and values in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Reads one request from `reader`.
///
/// A client that sent `Expect: 100-continue` gets an interim `100 Continue`
/// on `interim` before the rest of its body is read.
pub async fn read_request<R, W>(reader: &mut R, interim: &mut W) -> Result<Request, HttpError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(4096);
    let mut chunk = [0u8; 4096];
    let mut scanned = 0;

    let head_end = loop {
        if let Some(pos) = find(&buf[scanned..], HEAD_TERMINATOR) {
            break scanned + pos;
        }
        scanned = buf.len().saturating_sub(HEAD_TERMINATOR.len() - 1);

        if buf.len() > MAX_HEADER_BYTES {
            return Err(HttpError::TooLarge(format!(
                "request head exceeds {} bytes",
                MAX_HEADER_BYTES
            )));
        }

        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(HttpError::Incomplete);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    if head_end > MAX_HEADER_BYTES {
        return Err(HttpError::TooLarge(format!(
            "request head exceeds {} bytes",
            MAX_HEADER_BYTES
        )));
    }

    let head = std::str::from_utf8(&buf[..head_end])
        .map_err(|_| HttpError::BadRequest("request head is not UTF-8".to_string()))?;
    let (method, target, headers) = parse_head(head)?;

    if find_header(&headers, "transfer-encoding").is_some() {
        return Err(HttpError::BadRequest(
            "chunked request bodies are not supported".to_string(),
        ));
    }

    let content_length = match find_header(&headers, "content-length") {
        Some(value) => value.trim().parse::<usize>().map_err(|_| {
            HttpError::BadRequest(format!("invalid Content-Length: {:?}", value))
        })?,
        None => 0,
    };
    if content_length > MAX_BODY_BYTES {
        return Err(HttpError::TooLarge(format!(
            "request body of {} bytes exceeds {} bytes",
            content_length, MAX_BODY_BYTES
        )));
    }

    let mut body = buf.split_off(head_end + HEAD_TERMINATOR.len());
    body.truncate(content_length);
    let received = body.len();
    if received < content_length {
        if expects_continue(&headers) {
            interim.write_all(CONTINUE).await?;
            interim.flush().await?;
        }
        body.resize(content_length, 0);
        reader
            .read_exact(&mut body[received..])
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::UnexpectedEof => HttpError::Incomplete,
                _ => HttpError::Io(e),
            })?;
    }

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target, None),
    };

    Ok(Request {
        method,
        path,
        query,
        headers,
        body,
    })
}

fn expects_continue(headers: &[(String, String)]) -> bool {
    find_header(headers, "expect").is_some_and(|v| v.eq_ignore_ascii_case("100-continue"))
}

type Head = (String, String, Vec<(String, String)>);

fn parse_head(head: &str) -> Result<Head, HttpError> {
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();

    let mut parts = request_line.split_whitespace();
    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(t), Some(v), None) => (m, t, v),
        _ => {
            return Err(HttpError::BadRequest(format!(
                "invalid request line: {:?}",
                request_line
            )))
        }
    };
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::BadRequest(format!("unsupported version: {}", version)));
    }
    if !target.starts_with('/') {
        return Err(HttpError::BadRequest(format!("invalid target: {}", target)));
    }

    let headers = lines
        .map(|line| {
            line.split_once(':')
                .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
                .ok_or_else(|| HttpError::BadRequest(format!("invalid header line: {:?}", line)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((method.to_string(), target.to_string(), headers))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// A response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Headers besides `Content-Length` and `Connection`.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a response with a content type and body.
    pub fn new(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body,
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Status line and headers, including the blank line.
    pub fn head(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status));
        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");
        head.into_bytes()
    }

    /// Writes the response and flushes.
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.head()).await?;
        writer.write_all(&self.body).await?;
        writer.flush().await
    }
}

/// Reason phrase for the statuses the server emits.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
