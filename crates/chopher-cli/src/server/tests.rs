//! Tests for the upload server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tokio::io::{sink, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use crate::config::Settings;

use super::handler::{content_type_for, download_name, extract_upload, resolve_static_path};
use super::http::{read_request, HttpError, Request, Response, MAX_BODY_BYTES};
use super::multipart::{self, MultipartError};
use super::types::{error_codes, ErrorResponse};

const BOUNDARY: &str = "----chopherBoundary7MA4YWxk";

fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match filename {
            Some(f) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, f
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", name),
        };
        body.extend_from_slice(disposition.as_bytes());
        if filename.is_some() {
            body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn request(method: &str, path: &str, headers: &[(&str, &str)], body: Vec<u8>) -> Request {
    Request {
        method: method.to_string(),
        path: path.to_string(),
        query: None,
        headers: headers
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect(),
        body,
    }
}

// =========================================================================
// Request parsing
// =========================================================================

#[tokio::test]
async fn test_read_request_with_body() {
    let raw = b"POST /upload?x=1 HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
    let request = read_request(&mut &raw[..], &mut sink()).await.unwrap();

    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/upload");
    assert_eq!(request.query.as_deref(), Some("x=1"));
    assert_eq!(request.header("host"), Some("localhost"));
    assert_eq!(request.body, b"hello".to_vec());
}

#[tokio::test]
async fn test_read_request_ignores_trailing_bytes() {
    let raw = b"GET / HTTP/1.1\r\n\r\nextra";
    let request = read_request(&mut &raw[..], &mut sink()).await.unwrap();
    assert!(request.body.is_empty());
    assert!(request.headers.is_empty());
}

#[tokio::test]
async fn test_read_request_short_body_is_incomplete() {
    let raw = b"POST /upload HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
    let err = read_request(&mut &raw[..], &mut sink()).await.unwrap_err();
    assert!(matches!(err, HttpError::Incomplete));
}

#[tokio::test]
async fn test_read_request_rejects_malformed_heads() {
    for raw in [
        &b"GARBAGE\r\n\r\n"[..],
        &b"GET / SPDY/3\r\n\r\n"[..],
        &b"GET relative HTTP/1.1\r\n\r\n"[..],
        &b"GET / HTTP/1.1\r\nNoColonHere\r\n\r\n"[..],
        &b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n"[..],
        &b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n"[..],
    ] {
        let mut reader = raw;
        let err = read_request(&mut reader, &mut sink()).await.unwrap_err();
        assert!(matches!(err, HttpError::BadRequest(_)), "{:?}", err);
    }
}

#[tokio::test]
async fn test_read_request_limits() {
    let raw = format!(
        "POST /upload HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        MAX_BODY_BYTES + 1
    );
    let err = read_request(&mut raw.as_bytes(), &mut sink()).await.unwrap_err();
    assert!(matches!(err, HttpError::TooLarge(_)));

    let huge = format!("GET / HTTP/1.1\r\nX-Filler: {}\r\n\r\n", "a".repeat(70 * 1024));
    let err = read_request(&mut huge.as_bytes(), &mut sink()).await.unwrap_err();
    assert!(matches!(err, HttpError::TooLarge(_)));
}

#[tokio::test]
async fn test_read_request_answers_expect_continue() {
    let body = vec![b'x'; 10_000];
    let mut raw = format!(
        "POST /upload HTTP/1.1\r\nExpect: 100-continue\r\nContent-Length: {}\r\n\r\n",
        body.len()
    )
    .into_bytes();
    raw.extend_from_slice(&body);

    let mut interim = Vec::new();
    let request = read_request(&mut &raw[..], &mut interim).await.unwrap();
    assert_eq!(interim, b"HTTP/1.1 100 Continue\r\n\r\n".to_vec());
    assert_eq!(request.body, body);
}

#[tokio::test]
async fn test_read_request_without_expect_writes_nothing() {
    let body = vec![b'y'; 10_000];
    let mut raw = format!("POST /upload HTTP/1.1\r\nContent-Length: {}\r\n\r\n", body.len())
        .into_bytes();
    raw.extend_from_slice(&body);

    let mut interim = Vec::new();
    let request = read_request(&mut &raw[..], &mut interim).await.unwrap();
    assert!(interim.is_empty());
    assert_eq!(request.body.len(), 10_000);

    // Body already buffered with the head: nothing left to wait for.
    let raw = b"POST /upload HTTP/1.1\r\nExpect: 100-continue\r\nContent-Length: 2\r\n\r\nok";
    let mut interim = Vec::new();
    read_request(&mut &raw[..], &mut interim).await.unwrap();
    assert!(interim.is_empty());
}

#[tokio::test]
async fn test_read_request_eof_before_head() {
    let err = read_request(&mut &b"GET / HTTP/1.1\r\n"[..], &mut sink()).await.unwrap_err();
    assert!(matches!(err, HttpError::Incomplete));
}

// =========================================================================
// Responses and error bodies
// =========================================================================

#[test]
fn test_response_head() {
    let response = Response::new(200, "audio/wav", vec![1, 2, 3])
        .with_header("Content-Disposition", "attachment; filename=\"a.wav\"");
    let head = String::from_utf8(response.head()).unwrap();

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Type: audio/wav\r\n"));
    assert!(head.contains("Content-Disposition: attachment; filename=\"a.wav\"\r\n"));
    assert!(head.contains("Content-Length: 3\r\n"));
    assert!(head.ends_with("Connection: close\r\n\r\n"));
}

#[test]
fn test_error_response_json_shape() {
    let json = ErrorResponse::new(error_codes::NOT_FOUND, "not found: /x").to_json();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["success"], serde_json::json!(false));
    assert_eq!(value["errors"][0]["code"], serde_json::json!("SERVER_002"));
    assert_eq!(value["errors"][0]["message"], serde_json::json!("not found: /x"));
}

// =========================================================================
// Static files
// =========================================================================

#[test]
fn test_resolve_static_path() {
    let root = Path::new("/srv/static");
    assert_eq!(resolve_static_path(root, "/"), Some(PathBuf::from("/srv/static")));
    assert_eq!(
        resolve_static_path(root, "/js/app.js"),
        Some(PathBuf::from("/srv/static/js/app.js"))
    );
    assert_eq!(
        resolve_static_path(root, "/my%20song.html"),
        Some(PathBuf::from("/srv/static/my song.html"))
    );
    assert_eq!(
        resolve_static_path(root, "/./a//b"),
        Some(PathBuf::from("/srv/static/a/b"))
    );
}

#[test]
fn test_resolve_static_path_rejects_traversal() {
    let root = Path::new("/srv/static");
    assert_eq!(resolve_static_path(root, "/../etc/passwd"), None);
    assert_eq!(resolve_static_path(root, "/a/%2e%2e/%2e%2e/secret"), None);
    assert_eq!(resolve_static_path(root, "/a%2f..%2fb"), None);
    assert_eq!(resolve_static_path(root, "/a\\b"), None);
    assert_eq!(resolve_static_path(root, "/bad%zz"), None);
    assert_eq!(resolve_static_path(root, "/bad%+1"), None);
    assert_eq!(resolve_static_path(root, "/%ff"), None);
}

#[test]
fn test_content_type_for() {
    assert_eq!(content_type_for(Path::new("index.html")), "text/html; charset=utf-8");
    assert_eq!(content_type_for(Path::new("STYLE.CSS")), "text/css; charset=utf-8");
    assert_eq!(content_type_for(Path::new("a.wav")), "audio/wav");
    assert_eq!(content_type_for(Path::new("blob")), "application/octet-stream");
}

// =========================================================================
// Uploads
// =========================================================================

#[test]
fn test_download_name() {
    assert_eq!(download_name(Some("song.mp3")), "song.wav");
    assert_eq!(download_name(Some("C:\\Users\\me\\notes.txt")), "notes.wav");
    assert_eq!(download_name(Some("dir/archive.tar.gz")), "archive.tar.wav");
    assert_eq!(download_name(Some(".bashrc")), ".bashrc.wav");
    assert_eq!(download_name(Some("we\"ird;name.bin")), "we_ird_name.wav");
    assert_eq!(download_name(Some("")), "upload.wav");
    assert_eq!(download_name(None), "upload.wav");
}

#[test]
fn test_multipart_boundary() {
    assert!(multipart::is_multipart("multipart/form-data; boundary=abc"));
    assert!(!multipart::is_multipart("application/octet-stream"));
    assert_eq!(
        multipart::boundary("multipart/form-data; boundary=\"abc def\"").unwrap(),
        "abc def"
    );
    assert_eq!(
        multipart::boundary("multipart/form-data").unwrap_err(),
        MultipartError::MissingBoundary
    );
}

#[test]
fn test_multipart_first_file_skips_plain_fields() {
    let body = multipart_body(&[
        ("comment", None, b"hi"),
        ("file", Some("data.bin"), b"\x00\x01\r\n\x02"),
        ("other", Some("second.bin"), b"nope"),
    ]);
    let part = multipart::first_file(&body, BOUNDARY).unwrap();

    assert_eq!(part.field.as_deref(), Some("file"));
    assert_eq!(part.filename, "data.bin");
    assert_eq!(part.content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(part.data, b"\x00\x01\r\n\x02");
}

#[test]
fn test_multipart_errors() {
    let no_file = multipart_body(&[("comment", None, b"hi")]);
    assert_eq!(
        multipart::first_file(&no_file, BOUNDARY).unwrap_err(),
        MultipartError::NoFile
    );
    assert!(matches!(
        multipart::first_file(b"no boundaries here", BOUNDARY).unwrap_err(),
        MultipartError::Malformed(_)
    ));
}

#[test]
fn test_extract_upload_raw_and_multipart() {
    let raw = request("POST", "/upload", &[], b"raw bytes".to_vec());
    let upload = extract_upload(raw).unwrap();
    assert_eq!(upload.filename, None);
    assert_eq!(upload.data, b"raw bytes".to_vec());

    let content_type = format!("multipart/form-data; boundary={}", BOUNDARY);
    let body = multipart_body(&[("file", Some("a.txt"), b"abc")]);
    let form = request("POST", "/upload", &[("Content-Type", &content_type)], body);
    let upload = extract_upload(form).unwrap();
    assert_eq!(upload.filename.as_deref(), Some("a.txt"));
    assert_eq!(upload.data, b"abc".to_vec());
}

// =========================================================================
// End-to-end over TCP
// =========================================================================

struct TestServer {
    addr: std::net::SocketAddr,
    shutdown: broadcast::Sender<()>,
    _static_dir: tempfile::TempDir,
}

async fn start_server() -> TestServer {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<h1>chopher</h1>").unwrap();
    std::fs::create_dir(static_dir.path().join("css")).unwrap();
    std::fs::write(static_dir.path().join("css").join("site.css"), "body{}").unwrap();

    let settings = Settings {
        static_dir: static_dir.path().to_path_buf(),
        ..Settings::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, rx) = broadcast::channel(1);
    tokio::spawn(super::serve(listener, Arc::new(settings), rx));

    TestServer {
        addr,
        shutdown,
        _static_dir: static_dir,
    }
}

struct RawResponse {
    status: u16,
    head: String,
    body: Vec<u8>,
}

async fn send(addr: std::net::SocketAddr, raw: &[u8]) -> RawResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).await.unwrap();

    let split = bytes
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response should have a head");
    let head = String::from_utf8(bytes[..split].to_vec()).unwrap();
    let status = head.split(' ').nth(1).unwrap().parse().unwrap();
    RawResponse {
        status,
        head,
        body: bytes[split + 4..].to_vec(),
    }
}

fn post(path: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
    let mut raw = format!(
        "POST {} HTTP/1.1\r\nHost: test\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
        path,
        content_type,
        body.len()
    )
    .into_bytes();
    raw.extend_from_slice(body);
    raw
}

#[tokio::test]
async fn test_serves_index_and_assets() {
    let server = start_server().await;

    let index = send(server.addr, b"GET / HTTP/1.1\r\nHost: test\r\n\r\n").await;
    assert_eq!(index.status, 200);
    assert!(index.head.contains("text/html"));
    assert_eq!(index.body, b"<h1>chopher</h1>".to_vec());

    let css = send(server.addr, b"GET /css/site.css HTTP/1.1\r\n\r\n").await;
    assert_eq!(css.status, 200);
    assert!(css.head.contains("text/css"));

    let _ = server.shutdown.send(());
}

#[tokio::test]
async fn test_static_errors() {
    let server = start_server().await;

    let missing = send(server.addr, b"GET /missing.js HTTP/1.1\r\n\r\n").await;
    assert_eq!(missing.status, 404);
    let body: ErrorResponse = serde_json::from_slice(&missing.body).unwrap();
    assert!(!body.success);
    assert_eq!(body.errors[0].code, error_codes::NOT_FOUND);

    let traversal = send(server.addr, b"GET /../secret HTTP/1.1\r\n\r\n").await;
    assert_eq!(traversal.status, 400);

    let _ = server.shutdown.send(());
}

#[tokio::test]
async fn test_method_not_allowed() {
    let server = start_server().await;

    let put = send(server.addr, b"PUT /upload HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;
    assert_eq!(put.status, 405);
    assert!(put.head.contains("Allow: GET, POST"));

    let post_elsewhere = send(server.addr, &post("/index.html", "text/plain", b"x")).await;
    assert_eq!(post_elsewhere.status, 405);

    let _ = server.shutdown.send(());
}

#[tokio::test]
async fn test_upload_raw_body() {
    let server = start_server().await;

    let response = send(
        server.addr,
        &post("/upload", "application/octet-stream", b"raw upload bytes"),
    )
    .await;
    assert_eq!(response.status, 200);
    assert!(response.head.contains("Content-Type: audio/wav"));
    assert!(response.head.contains("filename=\"upload.wav\""));

    let reader = hound::WavReader::new(std::io::Cursor::new(response.body)).unwrap();
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.spec().sample_rate, 22000);

    let _ = server.shutdown.send(());
}

#[tokio::test]
async fn test_upload_waits_for_continue() {
    let server = start_server().await;
    let body = vec![0x42u8; 4096];

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    let head = format!(
        "POST /upload HTTP/1.1\r\nHost: test\r\nExpect: 100-continue\r\nContent-Length: {}\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).await.unwrap();

    let continue_line = b"HTTP/1.1 100 Continue\r\n\r\n";
    let mut interim = vec![0u8; continue_line.len()];
    tokio::time::timeout(std::time::Duration::from_secs(5), stream.read_exact(&mut interim))
        .await
        .expect("server should answer before the body is sent")
        .unwrap();
    assert_eq!(interim, continue_line.to_vec());

    stream.write_all(&body).await.unwrap();
    let mut rest = Vec::new();
    stream.read_to_end(&mut rest).await.unwrap();
    assert!(rest.starts_with(b"HTTP/1.1 200 OK\r\n"));

    let _ = server.shutdown.send(());
}

#[tokio::test]
async fn test_upload_multipart_matches_raw() {
    let server = start_server().await;
    let data = b"the same bytes either way";

    let content_type = format!("multipart/form-data; boundary={}", BOUNDARY);
    let form = multipart_body(&[("file", Some("poem.txt"), data)]);
    let multipart = send(server.addr, &post("/upload", &content_type, &form)).await;
    let raw = send(server.addr, &post("/upload", "application/octet-stream", data)).await;

    assert_eq!(multipart.status, 200);
    assert!(multipart.head.contains("attachment; filename=\"poem.wav\""));
    assert!(multipart.body == raw.body, "same bytes should render the same WAV");

    let _ = server.shutdown.send(());
}

#[tokio::test]
async fn test_upload_errors() {
    let server = start_server().await;

    let empty = send(server.addr, &post("/upload", "application/octet-stream", b"")).await;
    assert_eq!(empty.status, 400);

    let content_type = format!("multipart/form-data; boundary={}", BOUNDARY);
    let no_file = multipart_body(&[("comment", None, b"hi")]);
    let response = send(server.addr, &post("/upload", &content_type, &no_file)).await;
    assert_eq!(response.status, 400);
    let body: ErrorResponse = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body.errors[0].code, error_codes::BAD_REQUEST);

    let too_large = format!(
        "POST /upload HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        MAX_BODY_BYTES + 1
    );
    let response = send(server.addr, too_large.as_bytes()).await;
    assert_eq!(response.status, 413);

    let _ = server.shutdown.send(());
}
