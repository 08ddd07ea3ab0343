//! Scripted in-memory transport for testing sessions and drivers.
//!
//! [`MockDialer`] hands out [`Transport`]s that share one script of dial
//! outcomes and command responses, and records everything the session does
//! with them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use rcon_shell_core::{ConnectionConfig, Error, Result};

use crate::transport::{Dialer, Transport};

#[derive(Debug, Default)]
struct MockState {
    /// Pending dial outcomes; an empty queue means dials succeed.
    dial_failures: VecDeque<Option<String>>,
    /// Pending command outcomes; an empty queue answers with an empty string.
    responses: VecDeque<Result<String>>,
    dials: usize,
    sent: Vec<String>,
    closes: usize,
    open: usize,
    peak_open: usize,
}

/// Dialer whose transports follow a shared script.
#[derive(Debug, Clone, Default)]
pub struct MockDialer {
    state: Arc<Mutex<MockState>>,
}

impl MockDialer {
    /// Create a dialer whose dials succeed and whose commands answer `""`.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a successful dial.
    pub fn accept_dial(&self) -> &Self {
        self.state().dial_failures.push_back(None);
        self
    }

    /// Queue a dial failing with `reason`.
    pub fn refuse_dial(&self, reason: impl Into<String>) -> &Self {
        self.state().dial_failures.push_back(Some(reason.into()));
        self
    }

    /// Queue a response for the next command.
    pub fn respond(&self, text: impl Into<String>) -> &Self {
        self.state().responses.push_back(Ok(text.into()));
        self
    }

    /// Queue a failure for the next command.
    pub fn fail(&self, err: Error) -> &Self {
        self.state().responses.push_back(Err(err));
        self
    }

    /// Number of dial attempts so far.
    pub fn dials(&self) -> usize {
        self.state().dials
    }

    /// Commands that reached a transport, in order.
    pub fn sent(&self) -> Vec<String> {
        self.state().sent.clone()
    }

    /// Number of transports closed so far.
    pub fn closes(&self) -> usize {
        self.state().closes
    }

    /// Number of transports currently open.
    pub fn open(&self) -> usize {
        self.state().open
    }

    /// Highest number of transports that were open at the same time.
    pub fn peak_open(&self) -> usize {
        self.state().peak_open
    }
}

#[async_trait]
impl Dialer for MockDialer {
    async fn dial(&self, config: &ConnectionConfig) -> Result<Box<dyn Transport>> {
        let mut state = self.state();
        state.dials += 1;

        if let Some(Some(reason)) = state.dial_failures.pop_front() {
            return Err(Error::Connect {
                address: config.address(),
                reason,
            });
        }

        state.open += 1;
        state.peak_open = state.peak_open.max(state.open);
        drop(state);

        Ok(Box::new(MockTransport {
            state: Arc::clone(&self.state),
            closed: false,
        }))
    }
}

struct MockTransport {
    state: Arc<Mutex<MockState>>,
    closed: bool,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_command(&mut self, command: &str) -> Result<String> {
        if self.closed {
            return Err(Error::ConnectionClosed);
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.sent.push(command.to_string());
        state.responses.pop_front().unwrap_or_else(|| Ok(String::new()))
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.closes += 1;
            state.open -= 1;
        }
        Ok(())
    }
}
