//! Reconnecting RCON session.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use rcon_shell_core::{
    CommandResult, ConnectionConfig, Error, Result, RetryPolicy, SessionId, SessionState,
};

use crate::transport::{Dialer, Transport};

/// One logical client connection, including any reconnects.
///
/// The session exclusively owns its transport. When the server drops the
/// connection the old transport is closed before a replacement is dialed, so
/// at most one transport is ever open per session.
pub struct Session {
    /// Session identifier
    id: SessionId,

    /// Parameters used to (re)dial
    config: ConnectionConfig,

    /// Opens transports
    dialer: Arc<dyn Dialer>,

    /// Live transport, `None` while disconnected or after close
    transport: Option<Box<dyn Transport>>,

    /// Current lifecycle state
    state: SessionState,

    /// Reconnect policy
    retry: RetryPolicy,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Connect with the default retry policy.
    ///
    /// A failed first dial is returned as-is; there is no retry at this stage.
    pub async fn start(config: ConnectionConfig, dialer: Arc<dyn Dialer>) -> Result<Self> {
        Self::start_with_policy(config, dialer, RetryPolicy::default()).await
    }

    /// Connect with a custom retry policy.
    pub async fn start_with_policy(
        config: ConnectionConfig,
        dialer: Arc<dyn Dialer>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let id = SessionId::new();
        info!("Starting session: id={}, address={}", id, config.address());

        let transport = dialer.dial(&config).await.map_err(|e| {
            error!("Can't connect to server: id={}, error={}", id, e);
            e
        })?;

        info!("Session connected: id={}", id);

        Ok(Self {
            id,
            config,
            dialer,
            transport: Some(transport),
            state: SessionState::Connected,
            retry,
        })
    }

    /// Get the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Get the connection parameters.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Get the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check whether the session can no longer be used.
    pub fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            debug!(
                "Session state changed: id={}, {:?} → {:?}",
                self.id, self.state, state
            );
            self.state = state;
        }
    }

    /// Send a command to the server.
    ///
    /// An empty command is a no-op and never touches the network. When the
    /// server drops the connection the session reconnects and the caller still
    /// receives [`Error::ConnectionClosed`]; the command is not resent. If
    /// every reconnect attempt fails the last dial error is returned and the
    /// session is terminated.
    pub async fn send_command(&mut self, command: &str) -> Result<CommandResult> {
        if self.is_terminated() {
            return Err(Error::SessionTerminated);
        }

        if command.is_empty() {
            return Ok(CommandResult::empty());
        }

        let transport = self.transport.as_mut().ok_or(Error::SessionTerminated)?;

        let outcome = transport.send_command(command).await;

        match outcome {
            Ok(text) => {
                let result = CommandResult::new(text);
                if result.is_empty {
                    debug!("No response: id={}, command={:?}", self.id, command);
                }
                Ok(result)
            }
            Err(Error::ConnectionClosed) => {
                error!("Connection closed, reconnecting: id={}", self.id);
                self.reconnect().await?;
                Err(Error::ConnectionClosed)
            }
            Err(err) => Err(err),
        }
    }

    /// Replace a dead transport, giving up after `retry.max_attempts` dials.
    /// With no attempts allowed the session terminates with
    /// [`Error::ConnectionClosed`].
    async fn reconnect(&mut self) -> Result<()> {
        self.set_state(SessionState::Disconnected);
        self.close_transport().await;
        self.set_state(SessionState::Reconnecting);

        let max_attempts = self.retry.max_attempts;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            info!(
                "Reconnecting in {:?}: id={}, attempt={}/{}",
                self.retry.interval, self.id, attempt, max_attempts
            );
            tokio::time::sleep(self.retry.interval).await;

            let dialed = self.dialer.dial(&self.config).await;
            match dialed {
                Ok(transport) => {
                    self.transport = Some(transport);
                    self.set_state(SessionState::Connected);
                    info!("Reconnected: id={}, attempt={}", self.id, attempt);
                    return Ok(());
                }
                Err(err) => {
                    warn!(
                        "Reconnect attempt failed: id={}, attempt={}, error={}",
                        self.id, attempt, err
                    );
                    last_error = Some(err);
                }
            }
        }

        error!(
            "Can't reconnect to server, giving up: id={}, attempts={}",
            self.id, max_attempts
        );
        self.set_state(SessionState::Terminated);
        Err(last_error.unwrap_or(Error::ConnectionClosed))
    }

    async fn close_transport(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(err) = transport.close().await {
                warn!("Failed to close transport: id={}, error={}", self.id, err);
            }
        }
    }

    /// Close the session. Safe to call more than once.
    pub async fn close(&mut self) {
        if self.is_terminated() && self.transport.is_none() {
            return;
        }
        self.close_transport().await;
        self.set_state(SessionState::Terminated);
        info!("Session closed: id={}", self.id);
    }
}
