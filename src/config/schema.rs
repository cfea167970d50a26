//! Configuration schema definitions.
//!
//! All types derive Serde traits so a TOML file can override any field,
//! and every field has a default so a missing file means a usable config.
//! Configuration is an explicit value handed to constructors; there are
//! no mutable globals.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, backlog).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Input size limits.
    pub limits: LimitConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8888").
    pub bind_address: String,

    /// Accept backlog depth.
    pub backlog: u32,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8888".to_string(),
            backlog: 100,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-connection client read/write timeout in seconds.
    pub client_io_secs: u64,

    /// Upstream fetch timeout in seconds.
    pub fetch_secs: u64,
}

impl TimeoutConfig {
    pub fn client_io(&self) -> Duration {
        Duration::from_secs(self.client_io_secs)
    }

    pub fn fetch(&self) -> Duration {
        Duration::from_secs(self.fetch_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            client_io_secs: 30,
            fetch_secs: 15,
        }
    }
}

/// Input size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Hard cap on bytes accumulated while reading the request line.
    /// Enforced before reading past it, so a client that never sends a
    /// newline cannot grow the buffer beyond this.
    pub max_request_line_bytes: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_request_line_bytes: 8192,
        }
    }
}
