//! Upload server.
//!
//! Serves the static upload page and renders files posted to `/upload`.
//!
//! ## Routes
//!
//! - `GET <path>`: file under the static directory (`/` is `index.html`)
//! - `POST /upload`: `multipart/form-data` with a file part, or a raw body;
//!   answers with `audio/wav` as an attachment
//!
//! Errors are JSON bodies of the form
//! `{"success":false,"errors":[{"code":"SERVER_002","message":"..."}]}`.

mod handler;
mod http;
mod multipart;
mod types;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::Settings;

pub use handler::{content_type_for, download_name, resolve_static_path};
pub use http::{Request, Response, MAX_BODY_BYTES, MAX_HEADER_BYTES};
pub use types::{error_codes, ApiError, ErrorResponse};

/// Time allowed for a client to send its full request.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Run the upload server until Ctrl+C.
///
/// # Returns
/// Exit code: 0 on clean shutdown. Bind failures are errors.
pub fn run(settings: Settings) -> Result<ExitCode> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move { run_server(settings).await })
}

async fn run_server(settings: Settings) -> Result<ExitCode> {
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, static_dir = %settings.static_dir.display(), "upload server listening");

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            info!("shutting down");
            let _ = shutdown_tx.send(());
        }
    });

    serve(listener, Arc::new(settings), shutdown_rx).await;
    Ok(ExitCode::SUCCESS)
}

/// Accepts connections on `listener` until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    settings: Arc<Settings>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer)) => {
                        tokio::spawn(handle_connection(stream, peer, Arc::clone(&settings)));
                    }
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                    }
                }
            }
            _ = shutdown.recv() => {
                info!("server shutdown complete");
                break;
            }
        }
    }
}

/// Serves one request and closes the connection.
async fn handle_connection(mut stream: TcpStream, peer: SocketAddr, settings: Arc<Settings>) {
    let read = {
        let (mut reader, mut writer) = stream.split();
        tokio::time::timeout(READ_TIMEOUT, http::read_request(&mut reader, &mut writer)).await
    };

    let (method, path, response) = match read {
        Ok(Ok(request)) => {
            let method = request.method.clone();
            let path = request.path.clone();
            (method, path, handler::handle(request, settings).await)
        }
        Ok(Err(http::HttpError::Incomplete)) => {
            debug!(%peer, "connection closed before a full request");
            return;
        }
        Ok(Err(e)) => ("-".to_string(), "-".to_string(), handler::error_for(&e)),
        Err(_) => {
            debug!(%peer, "request timed out");
            return;
        }
    };

    if let Err(e) = response.write_to(&mut stream).await {
        warn!(%peer, error = %e, "failed to write response");
    }
    let _ = stream.shutdown().await;

    info!(
        %peer,
        %method,
        %path,
        status = response.status,
        bytes = response.body.len(),
        "request"
    );
}
