//! Session types for RCON session management.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an RCON session, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an RCON session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Transport is open and usable
    Connected,
    /// Connection loss detected, old transport discarded
    Disconnected,
    /// Dialing a replacement transport
    Reconnecting,
    /// Session is closed for good (absorbing)
    Terminated,
}

impl SessionState {
    /// Whether no further operation can succeed in this state.
    pub fn is_terminated(&self) -> bool {
        matches!(self, SessionState::Terminated)
    }
}

/// Outcome of a single command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Response text returned by the server
    pub text: String,
    /// Whether the response text is empty
    pub is_empty: bool,
}

impl CommandResult {
    /// Wrap a server response.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let is_empty = text.is_empty();
        Self { text, is_empty }
    }

    /// The no-op result produced for an empty command.
    pub fn empty() -> Self {
        Self::new(String::new())
    }
}

/// Bounded reconnection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of dial attempts before giving up
    pub max_attempts: u32,
    /// Pause before each dial attempt
    pub interval: Duration,
}

impl RetryPolicy {
    /// Default number of reconnect attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Default pause between reconnect attempts.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

    /// A policy that never reconnects: a dropped connection terminates the
    /// session at once.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            interval: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}
