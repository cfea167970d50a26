//! Per-connection request handling.
//!
//! # Responsibilities
//! - Read and validate the newline-terminated URL line
//! - Dispatch the fetch and classify its outcome
//! - Frame the result (or a diagnostic) and write it fully
//! - Close the connection on every exit path
//!
//! The connection walks Accepted → ReadingRequest → Fetching → Framing →
//! Closed, with early-close and timeout shortcuts straight to Closed.
//! The stream is owned by the handler task, so dropping it on any return
//! path closes the socket.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::RelayConfig;
use crate::fetch::Fetch;
use crate::protocol::frame::{self, FrameError, ERROR_CONTENT_TYPE};

/// Read chunk size while searching for the request newline.
const RECV_BUFSIZE: usize = 4096;

/// Outcome of the request-line read, before UTF-8 validation.
enum RequestRead {
    /// Bytes up to (excluding) the first newline.
    Line(Vec<u8>),
    /// Peer closed before a newline arrived.
    ClosedEarly,
    /// Accumulated bytes reached the configured cap without a newline.
    TooLong,
}

/// A frame write that did not complete.
#[derive(Debug)]
enum WriteError {
    /// Body length cannot be represented in the fixed header.
    Frame(FrameError),
    Io(std::io::Error),
}

/// Drive one accepted connection from request to close.
pub async fn handle_connection<F: Fetch>(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    fetcher: Arc<F>,
    config: RelayConfig,
) {
    let client_io = config.timeouts.client_io();

    let read = timeout(
        client_io,
        read_request_line(&mut stream, config.limits.max_request_line_bytes),
    )
    .await;
    let request = match read {
        Ok(Ok(request)) => request,
        Ok(Err(e)) => {
            tracing::warn!(peer_addr = %peer_addr, error = %e, "Request read failed");
            return;
        }
        Err(_) => {
            // The peer may no longer be listening; no frame is attempted.
            tracing::warn!(peer_addr = %peer_addr, "Connection timed out reading request");
            return;
        }
    };

    let line = match request {
        RequestRead::Line(line) => line,
        RequestRead::ClosedEarly => {
            tracing::info!(peer_addr = %peer_addr, "Connection closed before a full request arrived");
            return;
        }
        RequestRead::TooLong => {
            send_error(&mut stream, peer_addr, client_io, "Request line too long.").await;
            return;
        }
    };

    let url = match String::from_utf8(line) {
        Ok(url) => url.trim().to_string(),
        Err(_) => {
            send_error(
                &mut stream,
                peer_addr,
                client_io,
                "Invalid URL encoding; expected UTF-8.",
            )
            .await;
            return;
        }
    };
    if url.is_empty() {
        send_error(&mut stream, peer_addr, client_io, "No URL received.").await;
        return;
    }

    tracing::info!(peer_addr = %peer_addr, url = %url, "Fetching URL");

    match fetcher.fetch(&url, config.timeouts.fetch()).await {
        Ok(response) => {
            let sent = timeout(
                client_io,
                write_frame(&mut stream, &response.body, &response.content_type),
            )
            .await;
            match sent {
                Ok(Ok(())) => {
                    tracing::info!(
                        peer_addr = %peer_addr,
                        bytes = response.body.len(),
                        content_type = %response.content_type,
                        "Response sent"
                    );
                }
                Ok(Err(WriteError::Frame(e))) => {
                    // Fatal for this connection only; the accept loop is unaffected.
                    tracing::error!(peer_addr = %peer_addr, error = %e, "Response unrepresentable");
                }
                Ok(Err(WriteError::Io(e))) => {
                    tracing::warn!(peer_addr = %peer_addr, error = %e, "Failed to send response");
                }
                Err(_) => {
                    tracing::warn!(peer_addr = %peer_addr, "Connection timed out sending response");
                }
            }
        }
        Err(e) => {
            let message = e.to_string();
            tracing::warn!(peer_addr = %peer_addr, error = %message, "Fetch failed");
            send_error(&mut stream, peer_addr, client_io, &message).await;
        }
    }
}

/// Accumulate bytes until the first newline, the cap, or peer close.
///
/// The cap is checked before each read so the buffer never grows past
/// `max_len`, even when the peer sends no newline at all. Bytes after
/// the first newline are discarded.
async fn read_request_line(
    stream: &mut TcpStream,
    max_len: usize,
) -> std::io::Result<RequestRead> {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; RECV_BUFSIZE];

    loop {
        let want = RECV_BUFSIZE.min(max_len - buf.len());
        let n = stream.read(&mut chunk[..want]).await?;
        if n == 0 {
            return Ok(RequestRead::ClosedEarly);
        }

        let scan_from = buf.len();
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf[scan_from..].iter().position(|&b| b == b'\n') {
            buf.truncate(scan_from + pos);
            return Ok(RequestRead::Line(buf));
        }
        if buf.len() >= max_len {
            return Ok(RequestRead::TooLong);
        }
    }
}

/// Write the fixed headers as one unit, then the body.
///
/// `write_all` loops until every byte is accepted and maps a zero-byte
/// write to `WriteZero`, which is a broken connection here.
async fn write_frame(
    stream: &mut TcpStream,
    body: &[u8],
    content_type: &str,
) -> Result<(), WriteError> {
    let header =
        frame::encode_headers(body.len() as u64, content_type).map_err(WriteError::Frame)?;
    stream.write_all(&header).await.map_err(WriteError::Io)?;
    stream.write_all(body).await.map_err(WriteError::Io)?;
    stream.flush().await.map_err(WriteError::Io)?;
    Ok(())
}

/// Best-effort error frame.
///
/// The connection is already on a failure path, so a failure to deliver
/// the diagnostic is logged and swallowed.
async fn send_error(
    stream: &mut TcpStream,
    peer_addr: SocketAddr,
    io_timeout: Duration,
    message: &str,
) {
    let send = write_frame(stream, message.as_bytes(), ERROR_CONTENT_TYPE);
    match timeout(io_timeout, send).await {
        Ok(Ok(())) => {}
        Ok(Err(WriteError::Frame(e))) => {
            tracing::error!(peer_addr = %peer_addr, error = %e, "Error frame unrepresentable");
        }
        Ok(Err(WriteError::Io(e))) => {
            tracing::debug!(peer_addr = %peer_addr, error = %e, "Failed to deliver error frame");
        }
        Err(_) => {
            tracing::debug!(peer_addr = %peer_addr, "Timed out delivering error frame");
        }
    }
}
