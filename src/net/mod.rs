//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, SO_REUSEADDR, backlog, accept)
//!     → handed to server::handler as an owned stream
//!
//! Connection states:
//!     Accepted → ReadingRequest → Fetching → Framing → Closed
//! ```

pub mod listener;

pub use listener::{Listener, ListenerError};
