//! # rcon-shell-session
//!
//! Session lifecycle management for the rcon-shell client.
//!
//! This crate provides:
//! - The transport boundary and its `rcon`-backed implementation
//! - The reconnecting [`Session`]
//! - Interactive, single-shot and channel-fed command drivers
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on rcon-shell-core and
//! is consumed by the `rcon-shell` binary or by any embedding application.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod interactive;
pub mod oneshot;
pub mod session;
pub mod testing;
pub mod transport;

// Re-export commonly used types
pub use channel::ChannelDriver;
pub use interactive::InteractiveDriver;
pub use oneshot::run_once;
pub use session::Session;
pub use transport::{Dialer, RconDialer, Transport};
