//! Wire protocol subsystem.
//!
//! # Data Flow
//! ```text
//! Client → Server: <url>\n  (UTF-8, single trailing newline)
//!
//! Server → Client, always exactly one frame:
//!     [10 bytes: decimal body length, zero-padded]
//!     [100 bytes: content type, space-padded]
//!     [<length> bytes: body]
//!
//! Error responses reuse the same frame shape with a
//! text/plain; charset=utf-8 content type and a diagnostic body.
//! ```
//!
//! # Design Decisions
//! - Framing is pure byte manipulation; all socket I/O lives with the
//!   server handler and the client, so the codec is unit-testable
//! - The length header bounds bodies to < 10^10 bytes; larger bodies are
//!   a framing error for that connection, never a silent truncation

pub mod frame;

pub use frame::{FrameError, CONTENT_TYPE_HEADER_LEN, FRAME_HEADER_LEN, LENGTH_HEADER_LEN};
