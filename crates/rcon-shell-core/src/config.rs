//! Configuration types for the rcon-shell client.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Parameters needed to (re)establish an RCON connection.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Server host name or IP address
    pub host: String,
    /// Server RCON port
    pub port: u16,
    /// RCON password
    pub password: String,
}

impl ConnectionConfig {
    /// Create a connection config.
    pub fn new(host: impl Into<String>, port: u16, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            password: password.into(),
        }
    }

    /// `host:port` form used for dialing and logging.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate connection parameters.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("server.host cannot be empty".to_string()));
        }
        if self.port == 0 {
            return Err(Error::Config("server.port must be > 0".to_string()));
        }
        Ok(())
    }
}

// Keeps the password out of log output.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &"***")
            .finish()
    }
}

/// Client configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Server settings
    pub server: ServerSettings,
    /// Client behaviour settings
    pub client: ClientSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl ClientConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ClientConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        self.connection().validate()?;

        if self.client.max_line_len == 0 {
            return Err(Error::Config("client.max_line_len must be > 0".to_string()));
        }

        if self.client.result_buffer == 0 {
            return Err(Error::Config("client.result_buffer must be > 0".to_string()));
        }

        Ok(())
    }

    /// Connection parameters for the configured server.
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig::new(
            self.server.host.clone(),
            self.server.port,
            self.server.password.clone(),
        )
    }
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server host name or IP address
    pub host: String,
    /// Server RCON port
    pub port: u16,
    /// RCON password
    pub password: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 25575,
            password: String::new(),
        }
    }
}

/// Client behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Dial timeout in seconds (0 = no timeout)
    pub connect_timeout_secs: u64,
    /// Enable Minecraft RCON quirks
    pub minecraft_quirks: bool,
    /// Longest accepted interactive input line in bytes
    pub max_line_len: usize,
    /// Capacity of the channel driver's result queue
    pub result_buffer: usize,
}

impl ClientSettings {
    /// Default limit for a single interactive input line in bytes.
    pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

    /// Default capacity of the channel driver's result queue.
    pub const DEFAULT_RESULT_BUFFER: usize = 64;

    /// Dial timeout, `None` when disabled.
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            minecraft_quirks: false,
            max_line_len: Self::DEFAULT_MAX_LINE_LEN,
            result_buffer: Self::DEFAULT_RESULT_BUFFER,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 25575);
        assert_eq!(config.client.max_line_len, 65536);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ClientConfig::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_host() {
        let mut config = ClientConfig::default();
        config.server.host = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_line_limit() {
        let mut config = ClientConfig::default();
        config.client.max_line_len = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_result_buffer() {
        let mut config = ClientConfig::default();
        config.client.result_buffer = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
server:
  host: mc.example.org
  port: 27015
  password: hunter2

client:
  connect_timeout_secs: 3
  minecraft_quirks: true
  max_line_len: 1024
  result_buffer: 8

logging:
  level: debug
"#;

        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.server.host, "mc.example.org");
        assert_eq!(config.server.port, 27015);
        assert_eq!(config.server.password, "hunter2");
        assert_eq!(config.client.connect_timeout(), Some(Duration::from_secs(3)));
        assert!(config.client.minecraft_quirks);
        assert_eq!(config.client.max_line_len, 1024);
        assert_eq!(config.client.result_buffer, 8);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ClientConfig::from_yaml("server:\n  password: secret\n").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 25575);
        assert_eq!(config.server.password, "secret");
        assert_eq!(config.client.connect_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config = ClientConfig::from_yaml("client:\n  connect_timeout_secs: 0\n").unwrap();
        assert_eq!(config.client.connect_timeout(), None);
    }

    #[test]
    fn test_malformed_yaml() {
        let result = ClientConfig::from_yaml("server: [unclosed");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_connection_from_config() {
        let yaml = "server:\n  host: 10.0.0.5\n  port: 25575\n  password: pw\n";
        let connection = ClientConfig::from_yaml(yaml).unwrap().connection();
        assert_eq!(connection, ConnectionConfig::new("10.0.0.5", 25575, "pw"));
        assert_eq!(connection.address(), "10.0.0.5:25575");
    }

    #[test]
    fn test_debug_hides_password() {
        let connection = ConnectionConfig::new("localhost", 25575, "hunter2");
        let debug = format!("{connection:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("localhost"));
    }
}
