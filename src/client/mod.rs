//! Relay client subsystem: the decode side of the wire protocol.
//!
//! # Data Flow
//! ```text
//! RelayClient::fetch(url)
//!     → connect → write <url>\n
//!     → read 10 bytes  (decimal body length)
//!     → read 100 bytes (space-padded content type)
//!     → read exactly the declared body length
//!     → RelayResponse { body, content_type }
//! ```
//!
//! A short body is a protocol violation surfaced with both the declared
//! and the received byte counts, never a silently truncated result.

pub mod filename;

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::protocol::frame::{self, FrameError, CONTENT_TYPE_HEADER_LEN, LENGTH_HEADER_LEN};

/// Overall deadline for one relay transaction.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A decoded relay response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Errors surfaced by the relay client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("incomplete length header: expected {expected} bytes, got {actual}")]
    IncompleteLengthHeader { expected: usize, actual: usize },

    #[error("incomplete content-type header: expected {expected} bytes, got {actual}")]
    IncompleteContentTypeHeader { expected: usize, actual: usize },

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("incomplete body: expected {expected} bytes, got {actual}")]
    BodyTruncated { expected: u64, actual: u64 },

    #[error("relay transaction timed out after {0:?}")]
    Timeout(Duration),
}

/// One-shot client for the relay protocol.
///
/// Each call to [`fetch`](RelayClient::fetch) is a self-contained
/// transaction on a fresh connection; the client holds no connection
/// state and is not meant for concurrent use of a single transaction.
#[derive(Debug, Clone)]
pub struct RelayClient {
    addr: String,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch `url` through the relay: connect, send the URL line, decode
    /// the response frame. The whole transaction runs under one deadline.
    pub async fn fetch(&self, url: &str) -> Result<RelayResponse, ClientError> {
        match timeout(self.timeout, self.transact(url)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout(self.timeout)),
        }
    }

    async fn transact(&self, url: &str) -> Result<RelayResponse, ClientError> {
        let mut stream =
            TcpStream::connect(&self.addr)
                .await
                .map_err(|source| ClientError::Connect {
                    addr: self.addr.clone(),
                    source,
                })?;

        stream.write_all(url.as_bytes()).await?;
        stream.write_all(b"\n").await?;
        stream.flush().await?;

        let mut length_raw = [0u8; LENGTH_HEADER_LEN];
        let got = read_full(&mut stream, &mut length_raw).await?;
        if got < LENGTH_HEADER_LEN {
            return Err(ClientError::IncompleteLengthHeader {
                expected: LENGTH_HEADER_LEN,
                actual: got,
            });
        }
        let body_len = frame::parse_length_header(&length_raw)?;

        let mut ctype_raw = [0u8; CONTENT_TYPE_HEADER_LEN];
        let got = read_full(&mut stream, &mut ctype_raw).await?;
        if got < CONTENT_TYPE_HEADER_LEN {
            return Err(ClientError::IncompleteContentTypeHeader {
                expected: CONTENT_TYPE_HEADER_LEN,
                actual: got,
            });
        }
        let content_type = frame::parse_content_type_header(&ctype_raw);

        let mut body = vec![0u8; body_len as usize];
        let got = read_full(&mut stream, &mut body).await?;
        if (got as u64) < body_len {
            return Err(ClientError::BodyTruncated {
                expected: body_len,
                actual: got as u64,
            });
        }

        Ok(RelayResponse { body, content_type })
    }
}

/// Read until the buffer is full or the peer closes.
///
/// Returns the number of bytes actually read; short counts are decided
/// on by the caller, which knows which header or body was cut off.
async fn read_full(stream: &mut TcpStream, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = stream.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
