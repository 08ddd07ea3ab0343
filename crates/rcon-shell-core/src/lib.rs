//! # rcon-shell-core
//!
//! Core types for the rcon-shell client.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other rcon-shell crates. It provides:
//!
//! - Connection configuration and the YAML client configuration file
//! - Session types (SessionId, SessionState, CommandResult, RetryPolicy)
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - the session and binary crates depend
//! on this one, but this crate has no dependencies on other rcon-shell crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use config::{ClientConfig, ClientSettings, ConnectionConfig, LoggingSettings, ServerSettings};
pub use error::{Error, Result};
pub use session::{CommandResult, RetryPolicy, SessionId, SessionState};
