//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → passed explicitly into Listener / RelayServer constructors
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no reload mechanism
//! - All fields have defaults so the relay runs with no file at all
//! - CLI flags override the file; the core never reads the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::LimitConfig;
pub use schema::ListenerConfig;
pub use schema::RelayConfig;
pub use schema::TimeoutConfig;
