//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:  load config → validate → bind listener → accept loop
//! Shutdown: Ctrl-C → Shutdown::trigger → stop accepting → drain handlers
//! ```
//!
//! # Design Decisions
//! - Shutdown stops the accept loop only; in-flight handlers drain
//!   naturally (each is bounded by its own timeouts anyway)

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
