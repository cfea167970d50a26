//! Observability subsystem.
//!
//! All subsystems log through the tracing crate with structured fields
//! (peer address, URL, byte counts); logging.rs wires up the subscriber.

pub mod logging;
