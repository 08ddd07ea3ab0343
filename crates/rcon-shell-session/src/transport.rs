//! Transport boundary between the session and the RCON wire protocol.
//!
//! The session only ever sees [`Dialer`] and [`Transport`]; packet framing and
//! authentication live in the `rcon` crate behind [`RconDialer`].

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use rcon::Connection;
use tokio::net::TcpStream;
use tracing::{debug, info};

use rcon_shell_core::{ConnectionConfig, Error, Result};

/// An authenticated RCON connection.
///
/// `send_command` must report a dropped peer as [`Error::ConnectionClosed`]
/// and every other failure as [`Error::Command`].
#[async_trait]
pub trait Transport: Send {
    /// Send a command and wait for its response.
    async fn send_command(&mut self, command: &str) -> Result<String>;

    /// Close the connection. Calling it more than once has no effect.
    async fn close(&mut self) -> Result<()>;
}

/// Opens authenticated transports.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Connect and authenticate, failing with [`Error::Connect`].
    async fn dial(&self, config: &ConnectionConfig) -> Result<Box<dyn Transport>>;
}

/// Dialer backed by the `rcon` crate over TCP.
#[derive(Debug, Clone, Default)]
pub struct RconDialer {
    connect_timeout: Option<Duration>,
    minecraft_quirks: bool,
}

impl RconDialer {
    /// Create a dialer without timeout or protocol quirks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort a dial that takes longer than `timeout`.
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable the Minecraft server's protocol deviations.
    pub fn with_minecraft_quirks(mut self, enabled: bool) -> Self {
        self.minecraft_quirks = enabled;
        self
    }

    async fn connect(&self, config: &ConnectionConfig) -> Result<Connection<TcpStream>> {
        let address = config.address();
        let connect = <Connection<TcpStream>>::builder()
            .enable_minecraft_quirks(self.minecraft_quirks)
            .connect(address.as_str(), &config.password);

        let connected = match self.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, connect)
                .await
                .map_err(|_| Error::Connect {
                    address: address.clone(),
                    reason: format!("timed out after {timeout:?}"),
                })?,
            None => connect.await,
        };

        connected.map_err(|e| Error::Connect {
            address,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Dialer for RconDialer {
    async fn dial(&self, config: &ConnectionConfig) -> Result<Box<dyn Transport>> {
        debug!("Dialing RCON server: address={}", config.address());
        let conn = self.connect(config).await?;
        info!("Connected to RCON server: address={}", config.address());
        Ok(Box::new(RconTransport { conn: Some(conn) }))
    }
}

/// Transport over a live `rcon` connection.
struct RconTransport {
    /// `None` once closed
    conn: Option<Connection<TcpStream>>,
}

#[async_trait]
impl Transport for RconTransport {
    async fn send_command(&mut self, command: &str) -> Result<String> {
        let conn = self.conn.as_mut().ok_or(Error::ConnectionClosed)?;
        conn.cmd(command).await.map_err(classify)
    }

    async fn close(&mut self) -> Result<()> {
        // Dropping the connection shuts the socket down.
        if self.conn.take().is_some() {
            debug!("RCON connection closed");
        }
        Ok(())
    }
}

/// Split `rcon` failures into connection loss and command errors.
fn classify(err: rcon::Error) -> Error {
    match err {
        rcon::Error::Io(io_err) if is_disconnect(&io_err) => Error::ConnectionClosed,
        other => Error::Command(other.to_string()),
    }
}

fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
    )
}
