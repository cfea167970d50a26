//! Minimal forward relay over a fixed-width framing protocol.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────┐
//!                      │                RELAY SERVER                 │
//!   relay-client       │                                             │
//!   ────<url>\n───────▶│  net::Listener ──▶ server::handler          │
//!                      │                        │                    │
//!                      │                        ▼                    │
//!                      │                   fetch::Fetch ────────────▶│──── origin
//!                      │                        │                    │     HTTP(S)
//!                      │                        ▼                    │
//!   ◀──[10B len][100B ctype][body]── protocol::frame ◀───────────────│
//!                      │                                             │
//!                      │  config · lifecycle · observability         │
//!                      └────────────────────────────────────────────┘
//! ```
//!
//! Each accepted connection is one self-contained transaction handled by
//! its own task: read a URL line, fetch it, frame the outcome, close.

// Core subsystems
pub mod client;
pub mod config;
pub mod fetch;
pub mod net;
pub mod protocol;
pub mod server;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use client::{RelayClient, RelayResponse};
pub use config::RelayConfig;
pub use fetch::{Fetch, FetchError, FetchResponse, HttpFetcher};
pub use lifecycle::Shutdown;
pub use server::RelayServer;
