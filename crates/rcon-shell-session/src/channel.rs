//! Channel-fed driver for embedding a session in a larger async system.
//!
//! Commands arrive on an [`mpsc::Receiver`]; status and result lines are
//! published on an [`mpsc::Sender`]. An empty command is the stop sentinel.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use rcon_shell_core::{Error, Result};

use crate::session::Session;

/// Published after a command reached the server.
pub fn sent_message(command: &str) -> String {
    format!("command \"{command}\" sent")
}

/// Published when a command fails.
pub fn failed_message(err: &Error) -> String {
    format!("exec failed: {err}")
}

/// Published after an empty response.
pub const EMPTY_RESPONSE_MESSAGE: &str = "response is empty";

/// Drives a [`Session`] from a command queue.
///
/// The result queue is bounded; the driver waits for capacity before
/// publishing, so a slow consumer slows the command stream down.
#[derive(Debug)]
pub struct ChannelDriver {
    session: Session,
    commands: mpsc::Receiver<String>,
    results: mpsc::Sender<String>,
}

impl ChannelDriver {
    /// Create a driver over a command queue and a result queue.
    pub fn new(
        session: Session,
        commands: mpsc::Receiver<String>,
        results: mpsc::Sender<String>,
    ) -> Self {
        Self {
            session,
            commands,
            results,
        }
    }

    /// Spawn a driver on the current runtime with both queues bounded to
    /// `capacity` (usually `client.result_buffer` from the configuration).
    ///
    /// Returns the command sender, the result receiver and the driver task.
    pub fn spawn(
        session: Session,
        capacity: usize,
    ) -> (mpsc::Sender<String>, mpsc::Receiver<String>, JoinHandle<Result<()>>) {
        let capacity = capacity.max(1);
        let (command_tx, command_rx) = mpsc::channel(capacity);
        let (result_tx, result_rx) = mpsc::channel(capacity);
        debug!(
            "Spawning channel driver: session={}, capacity={}",
            session.id(),
            capacity
        );
        let handle = tokio::spawn(Self::new(session, command_rx, result_tx).run());
        (command_tx, result_rx, handle)
    }

    /// Process commands until the stop sentinel (`Ok`), until either queue is
    /// closed ([`Error::ChannelClosed`]) or until failed reconnects terminate
    /// the session. The session is closed on every path.
    pub async fn run(mut self) -> Result<()> {
        let result = self.run_loop().await;
        self.session.close().await;
        result
    }

    async fn run_loop(&mut self) -> Result<()> {
        loop {
            let Some(command) = self.commands.recv().await else {
                error!("Command channel closed: session={}", self.session.id());
                return Err(Error::ChannelClosed("command"));
            };

            if command.is_empty() {
                info!("Stop sentinel received: session={}", self.session.id());
                return Ok(());
            }

            let sent = self.session.send_command(&command).await;
            match sent {
                Ok(result) => {
                    debug!("Command sent: command={:?}", command);
                    self.publish(sent_message(&command)).await?;
                    self.publish(result.text).await?;
                    if result.is_empty {
                        warn!("Response is empty: command={:?}", command);
                        self.publish(EMPTY_RESPONSE_MESSAGE.to_string()).await?;
                    }
                }
                Err(e) => {
                    error!("Can't send command: command={:?}, error={}", command, e);
                    self.publish(failed_message(&e)).await?;
                    if self.session.is_terminated() {
                        return Err(e);
                    }
                }
            }
        }
    }

    async fn publish(&mut self, message: String) -> Result<()> {
        self.results.send(message).await.map_err(|_| {
            error!("Result channel closed: session={}", self.session.id());
            Error::ChannelClosed("result")
        })
    }
}
