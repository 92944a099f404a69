//! Request routing and handlers for the upload server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, warn};

use crate::commands::sonify;
use crate::config::Settings;

use super::http::{HttpError, Request, Response};
use super::multipart::{self, MultipartError};
use super::types::{error_codes, error_response};

/// File served for directory requests.
const INDEX_FILE: &str = "index.html";

/// Filename used when the client supplies none.
const FALLBACK_STEM: &str = "upload";

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// Routes a request to its handler.
///
/// `POST /upload` renders the upload; every other `GET` is a static file;
/// anything else is 405.
pub async fn handle(request: Request, settings: Arc<Settings>) -> Response {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/upload") => upload(request, settings).await,
        ("GET", path) => serve_static(&settings.static_dir, path).await,
        (method, path) => error_response(
            405,
            error_codes::METHOD_NOT_ALLOWED,
            format!("{} is not allowed on {}", method, path),
        )
        .with_header("Allow", if path == "/upload" { "GET, POST" } else { "GET" }),
    }
}

/// Response for a request that could not be read.
pub fn error_for(err: &HttpError) -> Response {
    match err {
        HttpError::TooLarge(message) => {
            error_response(413, error_codes::PAYLOAD_TOO_LARGE, message.clone())
        }
        HttpError::BadRequest(_) | HttpError::Incomplete => {
            error_response(400, error_codes::BAD_REQUEST, err.to_string())
        }
        HttpError::Io(_) => error_response(500, error_codes::INTERNAL, err.to_string()),
    }
}

async fn upload(request: Request, settings: Arc<Settings>) -> Response {
    let upload = match extract_upload(request) {
        Ok(upload) => upload,
        Err(e) => return error_response(400, error_codes::BAD_REQUEST, e.to_string()),
    };
    if upload.data.is_empty() {
        return error_response(400, error_codes::BAD_REQUEST, "upload is empty");
    }

    let name = download_name(upload.filename.as_deref());
    let data = upload.data;
    let rendered = tokio::task::spawn_blocking(move || sonify(&data[..], &settings)).await;

    match rendered {
        Ok(Ok(wave)) => match wave.bytes() {
            Ok(body) => Response::new(200, "audio/wav", body).with_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", name),
            ),
            Err(e) => {
                error!(error = %e, "failed to encode WAV");
                error_response(500, error_codes::RENDER_FAILED, e.to_string())
            }
        },
        Ok(Err(e)) => {
            error!(error = %format!("{:#}", e), "render failed");
            error_response(500, error_codes::RENDER_FAILED, format!("{:#}", e))
        }
        Err(e) => {
            error!(error = %e, "render task failed");
            error_response(500, error_codes::INTERNAL, "render task failed")
        }
    }
}

/// Pulls the uploaded bytes out of a request.
///
/// Multipart bodies yield their first file part; any other body is taken
/// as the file itself.
pub fn extract_upload(request: Request) -> Result<Upload, MultipartError> {
    let content_type = request.header("content-type").unwrap_or_default();
    if !multipart::is_multipart(content_type) {
        return Ok(Upload {
            filename: None,
            data: request.body,
        });
    }

    let boundary = multipart::boundary(content_type)?;
    let part = multipart::first_file(&request.body, &boundary)?;
    Ok(Upload {
        filename: Some(part.filename),
        data: part.data.to_vec(),
    })
}

/// Name of the WAV returned for an uploaded filename.
///
/// Keeps the final path segment without its extension and replaces
/// characters that would break the `Content-Disposition` header.
pub fn download_name(filename: Option<&str>) -> String {
    let base = filename
        .and_then(|f| f.rsplit(['/', '\\']).next())
        .unwrap_or_default();
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        format!("{}.wav", FALLBACK_STEM)
    } else {
        format!("{}.wav", cleaned)
    }
}

async fn serve_static(root: &Path, url_path: &str) -> Response {
    let Some(mut path) = resolve_static_path(root, url_path) else {
        return error_response(400, error_codes::BAD_REQUEST, format!("invalid path: {}", url_path));
    };

    if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
        path.push(INDEX_FILE);
    }

    match tokio::fs::read(&path).await {
        Ok(body) => Response::new(200, content_type_for(&path), body),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error_response(404, error_codes::NOT_FOUND, format!("not found: {}", url_path))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read static file");
            error_response(500, error_codes::INTERNAL, "failed to read file")
        }
    }
}

/// Maps a URL path onto the static root.
///
/// Percent-escapes are decoded first; `None` when the path is not valid
/// UTF-8 or tries to leave the root.
pub fn resolve_static_path(root: &Path, url_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode(url_path)?;
    let mut path = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains(['\\', '\0']) => return None,
            s => path.push(s),
        }
    }
    Some(path)
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Content type chosen by file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("wasm") => "application/wasm",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}
