//! Fetch collaborator subsystem.
//!
//! # Data Flow
//! ```text
//! Parsed URL (from server handler)
//!     → Fetch::fetch(url, timeout)
//!     → FetchResponse { body, content_type } on success
//!     → FetchError on failure, classified into:
//!         HttpStatus  (origin answered with a non-success status)
//!         Transport   (resolution / connect / timeout trouble)
//!         Other       (anything else)
//! ```
//!
//! # Design Decisions
//! - The server depends only on the `Fetch` trait; tests substitute a
//!   canned implementation without touching the network
//! - Error messages are formatted deterministically from structured
//!   variants and become error-frame bodies verbatim
//! - Exactly one attempt per request; outcomes are never retried

pub mod http;

pub use http::HttpFetcher;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Content type assumed when the origin does not report one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A fetched document: raw body plus the origin's content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Classified fetch failures.
///
/// The `Display` text of each variant is sent to the requesting client
/// as an error-frame body, so the wording is part of the protocol.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The origin answered with a non-success HTTP status.
    #[error("HTTP error {code}: {reason}")]
    HttpStatus { code: u16, reason: String },

    /// The URL could not be resolved or the transport failed.
    #[error("URL error: {0}")]
    Transport(String),

    /// Any other failure while fetching.
    #[error("Fetch failed: {0}")]
    Other(String),
}

/// Capability that retrieves a URL on behalf of the relay server.
pub trait Fetch: Send + Sync + 'static {
    /// Fetch `url` with a bounded timeout. One attempt, no retries.
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}
