//! # rcon-shell
//!
//! Source RCON client for game server administration.
//!
//! ## Overview
//!
//! - With trailing words: connect, run them as one command, print the
//!   response, disconnect.
//! - Without: open an interactive shell that reconnects when the server
//!   drops the connection.
//!
//! ## Architecture
//!
//! This is Layer 2 - the binary that ties together:
//! - rcon-shell-core: Configuration, session types, errors
//! - rcon-shell-session: Transport, session and drivers

use std::sync::Arc;

use clap::Parser;
use rcon_shell::{logging, Cli};
use rcon_shell_session::{run_once, InteractiveDriver, RconDialer, Session};
use tokio::io::BufReader;
use tokio::sync::watch;

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(Cli::parse()));
    // A pending stdin read would otherwise hold the runtime open after ^C.
    runtime.shutdown_background();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;

    logging::init(logging::filter(
        cli.log_level.as_deref(),
        &config.logging.level,
    )?)?;

    tracing::info!(
        "rcon-shell v{} starting: server={}",
        env!("CARGO_PKG_VERSION"),
        config.connection().address()
    );

    let dialer = Arc::new(
        RconDialer::new()
            .with_connect_timeout(config.client.connect_timeout())
            .with_minecraft_quirks(config.client.minecraft_quirks),
    );

    if let Some(command) = cli.single_command() {
        let result = run_once(dialer, config.connection(), &command).await?;
        if !result.is_empty {
            println!("{}", result.text);
        }
        return Ok(());
    }

    let session = Session::start(config.connection(), dialer).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        let _ = shutdown_tx.send(true);
    });

    InteractiveDriver::new(session, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .with_max_line_len(config.client.max_line_len)
        .with_shutdown(shutdown_rx)
        .run()
        .await?;

    tracing::info!("rcon-shell shutting down");

    Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("Can't listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
