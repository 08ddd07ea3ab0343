//! Error types for the rcon-shell client.

use thiserror::Error;

/// Main error type for RCON session operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Dialing the server failed (initial connect or a reconnect attempt)
    #[error("Can't connect to {address}: {reason}")]
    Connect {
        /// Address that was dialed (`host:port`)
        address: String,
        /// Underlying failure
        reason: String,
    },

    /// The peer dropped the connection
    #[error("Connection closed")]
    ConnectionClosed,

    /// The command could not be executed (rejected, malformed, auth, ...)
    #[error("Command error: {0}")]
    Command(String),

    /// Interactive input line exceeded the configured limit
    #[error("Input too long: {len} bytes (max: {max})")]
    InputTooLong {
        /// Length of the offending line in bytes
        len: usize,
        /// Configured maximum line length
        max: usize,
    },

    /// A channel driver queue was closed by its other end
    #[error("Channel closed: {0}")]
    ChannelClosed(&'static str),

    /// Session already terminated
    #[error("Session already terminated")]
    SessionTerminated,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the connection to the server was lost.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, Error::ConnectionClosed)
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_error() {
        let err = Error::Connect {
            address: "127.0.0.1:25575".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Can't connect to 127.0.0.1:25575: connection refused"
        );
    }

    #[test]
    fn test_connection_closed_error() {
        let err = Error::ConnectionClosed;
        assert_eq!(err.to_string(), "Connection closed");
        assert!(err.is_connection_closed());
    }

    #[test]
    fn test_command_error_is_not_connection_closed() {
        let err = Error::Command("connection closed".to_string());
        assert!(!err.is_connection_closed());
    }

    #[test]
    fn test_input_too_long_error() {
        let err = Error::InputTooLong { len: 70000, max: 65536 };
        assert_eq!(err.to_string(), "Input too long: 70000 bytes (max: 65536)");
    }

    #[test]
    fn test_channel_closed_error() {
        let err = Error::ChannelClosed("command");
        assert_eq!(err.to_string(), "Channel closed: command");
    }

    #[test]
    fn test_session_terminated_error() {
        let err = Error::SessionTerminated;
        assert_eq!(err.to_string(), "Session already terminated");
    }

    #[test]
    fn test_config_error() {
        let err = Error::Config("server.port must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: server.port must be > 0"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }
}
