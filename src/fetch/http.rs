//! HTTP(S) fetcher backed by reqwest.
//!
//! # Responsibilities
//! - Perform the single GET attempt with a bounded timeout
//! - Default the content type when the origin omits it
//! - Classify reqwest failures into the relay's error taxonomy

use std::time::Duration;

use crate::fetch::{Fetch, FetchError, FetchResponse, DEFAULT_CONTENT_TYPE};

const USER_AGENT: &str = concat!("relay-proxy/", env!("CARGO_PKG_VERSION"));

/// Production `Fetch` implementation over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Other(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let body = response.bytes().await.map_err(classify)?.to_vec();

        Ok(FetchResponse { body, content_type })
    }
}

/// Map a reqwest error onto the relay taxonomy, carrying the root cause.
fn classify(err: reqwest::Error) -> FetchError {
    let reason = root_cause(&err);
    if err.is_builder() || err.is_connect() || err.is_timeout() || err.is_redirect() {
        FetchError::Transport(reason)
    } else {
        FetchError::Other(reason)
    }
}

/// Walk the source chain to the innermost error.
///
/// reqwest wraps hyper which wraps std::io; the innermost message is the
/// one worth relaying (e.g. "Name or service not known" for a failed
/// DNS lookup) instead of several layers of "error sending request".
fn root_cause(err: &dyn std::error::Error) -> String {
    let mut cause: &dyn std::error::Error = err;
    while let Some(source) = cause.source() {
        cause = source;
    }
    cause.to_string()
}
