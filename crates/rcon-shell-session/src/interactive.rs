//! Interactive REPL driver.
//!
//! Reads one command per line, sends it through the [`Session`] and prints the
//! server's response until end of input, an `exit`/`stop` line or an
//! interrupt.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tracing::{error, info, warn};

use rcon_shell_core::{ClientSettings, Error, Result};

use crate::session::Session;

/// Lines that end the interactive session.
pub const EXIT_COMMANDS: [&str; 2] = ["exit", "stop"];

/// Input read failures in a row after which the driver gives up.
pub const MAX_CONSECUTIVE_READ_ERRORS: u32 = 5;

/// Outcome of reading one input line.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Text(String),
    TooLong(usize),
    Eof,
}

/// Read one line, discarding the rest of it once it exceeds `max` bytes.
async fn read_line<R>(reader: &mut R, max: usize) -> io::Result<Line>
where
    R: AsyncBufRead + Unpin,
{
    // One spare byte so a trailing '\r' never pushes a valid line over.
    let cap = max.saturating_add(1);
    let mut buf = Vec::new();
    let mut len = 0;
    let mut last = None;
    let mut saw_input = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            break;
        }
        saw_input = true;

        let (chunk, consumed, done) = match available.iter().position(|b| *b == b'\n') {
            Some(i) => (&available[..i], i + 1, true),
            None => (available, available.len(), false),
        };

        len += chunk.len();
        last = chunk.last().copied().or(last);
        let room = cap.saturating_sub(buf.len());
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
        reader.consume(consumed);

        if done {
            break;
        }
    }

    if !saw_input {
        return Ok(Line::Eof);
    }

    if last == Some(b'\r') {
        len -= 1;
    }

    if len > max {
        return Ok(Line::TooLong(len));
    }
    buf.truncate(len);

    String::from_utf8(buf)
        .map(Line::Text)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Resolves once the shutdown flag turns true; never resolves if the sender
/// is gone.
async fn interrupted(shutdown: &mut watch::Receiver<bool>) {
    let sender_gone = shutdown.wait_for(|stop| *stop).await.is_err();
    if sender_gone {
        std::future::pending::<()>().await;
    }
}

/// Line-oriented command loop over one [`Session`].
pub struct InteractiveDriver<R, W> {
    session: Session,
    input: R,
    output: W,
    prompt: String,
    max_line_len: usize,
    shutdown: watch::Receiver<bool>,
}

impl<R, W> InteractiveDriver<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a driver reading commands from `input` and writing the prompt
    /// and responses to `output`.
    pub fn new(session: Session, input: R, output: W) -> Self {
        let prompt = format!("rcon@{}> ", session.config().address());
        // Sender dropped right away: never interrupted unless replaced.
        let (_, shutdown) = watch::channel(false);
        Self {
            session,
            input,
            output,
            prompt,
            max_line_len: ClientSettings::DEFAULT_MAX_LINE_LEN,
            shutdown,
        }
    }

    /// Stop when the watched flag becomes `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Override the longest accepted input line.
    pub fn with_max_line_len(mut self, max: usize) -> Self {
        self.max_line_len = max;
        self
    }

    /// Run until end of input, `exit`/`stop`, an interrupt, or until the
    /// session is terminated by failed reconnects. Input that fails to read
    /// [`MAX_CONSECUTIVE_READ_ERRORS`] times in a row ends the run with the
    /// last read error. The session is closed on every path.
    pub async fn run(mut self) -> Result<()> {
        let result = self.run_loop().await;
        if let Err(e) = self.output.flush().await {
            warn!("Failed to flush output: {}", e);
        }
        self.session.close().await;
        result
    }

    async fn run_loop(&mut self) -> Result<()> {
        let mut read_errors = 0;
        loop {
            let stop = *self.shutdown.borrow();
            if stop {
                return self.on_interrupt().await;
            }

            self.output.write_all(self.prompt.as_bytes()).await?;
            self.output.flush().await?;

            let read = tokio::select! {
                biased;
                _ = interrupted(&mut self.shutdown) => return self.on_interrupt().await,
                read = read_line(&mut self.input, self.max_line_len) => read,
            };

            if read.is_ok() {
                read_errors = 0;
            }

            let line = match read {
                Ok(Line::Text(line)) => line,
                Ok(Line::Eof) => {
                    info!("EOF detected, exiting...");
                    return Ok(());
                }
                Ok(Line::TooLong(len)) => {
                    let err = Error::InputTooLong {
                        len,
                        max: self.max_line_len,
                    };
                    error!("Input too long: {}", err);
                    continue;
                }
                Err(e) => {
                    read_errors += 1;
                    error!("Can't read input: attempt={}, error={}", read_errors, e);
                    if read_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                        error!("Input keeps failing, exiting: session={}", self.session.id());
                        return Err(e.into());
                    }
                    continue;
                }
            };

            if line.is_empty() {
                self.output.write_all(b"\n").await?;
                continue;
            }

            if EXIT_COMMANDS.contains(&line.as_str()) {
                info!("Exit requested: session={}", self.session.id());
                return Ok(());
            }

            let sent = self.session.send_command(&line).await;
            match sent {
                Ok(result) if result.is_empty => {
                    info!("No response.");
                }
                Ok(result) => {
                    self.output.write_all(result.text.as_bytes()).await?;
                    if !result.text.ends_with('\n') {
                        self.output.write_all(b"\n").await?;
                    }
                    info!("Command executed: command={:?}, bytes={}", line, result.text.len());
                }
                Err(e) if self.session.is_terminated() => {
                    error!("Session terminated, exiting: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Can't execute command: command={:?}, error={}", line, e);
                }
            }
        }
    }

    async fn on_interrupt(&mut self) -> Result<()> {
        self.output.write_all(b"\nCaught ^C, exiting...\n").await?;
        self.output.flush().await?;
        info!("Interrupted: session={}", self.session.id());
        Ok(())
    }
}
