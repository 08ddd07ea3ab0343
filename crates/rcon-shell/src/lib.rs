//! rcon-shell Library
//!
//! Command-line parsing and process setup for the `rcon-shell` binary.
//! The actual entry point is in main.rs.

pub mod cli;
pub mod logging;

// Re-export commonly used types
pub use cli::Cli;
