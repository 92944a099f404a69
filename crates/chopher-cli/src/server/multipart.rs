//! `multipart/form-data` parsing for uploads.
//!
//! Only what the upload form needs: find the first part that carries a
//! filename and borrow its bytes from the request body.

use thiserror::Error;

/// Errors raised while parsing a multipart body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MultipartError {
    /// The content type lacks a boundary parameter.
    #[error("multipart content type has no boundary")]
    MissingBoundary,

    /// The body does not follow the multipart framing.
    #[error("malformed multipart body: {0}")]
    Malformed(&'static str),

    /// No part carries a filename.
    #[error("multipart body contains no file")]
    NoFile,
}

/// A file part borrowed from a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart<'a> {
    /// Form field name.
    pub field: Option<String>,
    /// Client-supplied filename.
    pub filename: String,
    /// Part content type, if given.
    pub content_type: Option<String>,
    /// File bytes.
    pub data: &'a [u8],
}

/// Whether a `Content-Type` value denotes `multipart/form-data`.
pub fn is_multipart(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("multipart/form-data"))
}

/// Extracts the boundary parameter of a `Content-Type` value.
pub fn boundary(content_type: &str) -> Result<String, MultipartError> {
    header_params(content_type)
        .find(|(key, _)| key.eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
        .ok_or(MultipartError::MissingBoundary)
}

/// Returns the first part of `body` that carries a filename.
pub fn first_file<'a>(body: &'a [u8], boundary: &str) -> Result<FilePart<'a>, MultipartError> {
    let delimiter = format!("--{}", boundary).into_bytes();
    let close = [b"\r\n".as_slice(), &delimiter].concat();

    let mut pos = find(body, &delimiter).ok_or(MultipartError::Malformed("no opening boundary"))?;

    loop {
        pos += delimiter.len();
        let rest = &body[pos..];
        if rest.starts_with(b"--") {
            return Err(MultipartError::NoFile);
        }
        if !rest.starts_with(b"\r\n") {
            return Err(MultipartError::Malformed("boundary not followed by CRLF"));
        }
        pos += 2;

        let head_len = find(&body[pos..], b"\r\n\r\n")
            .ok_or(MultipartError::Malformed("unterminated part headers"))?;
        let head = String::from_utf8_lossy(&body[pos..pos + head_len]);
        let data_start = pos + head_len + 4;

        let data_len = find(&body[data_start..], &close)
            .ok_or(MultipartError::Malformed("unterminated part"))?;
        let data = &body[data_start..data_start + data_len];

        let mut field = None;
        let mut filename = None;
        let mut content_type = None;
        for line in head.split("\r\n") {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            if name.trim().eq_ignore_ascii_case("content-disposition") {
                for (key, param) in header_params(value) {
                    if key.eq_ignore_ascii_case("name") {
                        field = Some(param.to_string());
                    } else if key.eq_ignore_ascii_case("filename") {
                        filename = Some(param.to_string());
                    }
                }
            } else if name.trim().eq_ignore_ascii_case("content-type") {
                content_type = Some(value.trim().to_string());
            }
        }

        if let Some(filename) = filename {
            return Ok(FilePart {
                field,
                filename,
                content_type,
                data,
            });
        }

        // Skip the CRLF preceding the next delimiter
        pos = data_start + data_len + 2;
    }
}

/// `key=value` parameters of a header value, quotes stripped.
fn header_params(value: &str) -> impl Iterator<Item = (&str, &str)> {
    value.split(';').skip(1).filter_map(|param| {
        let (key, value) = param.split_once('=')?;
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        Some((key.trim(), value))
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
