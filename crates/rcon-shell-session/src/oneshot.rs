//! Single-shot driver: connect, run one command, disconnect.

use std::sync::Arc;

use tracing::{error, info, warn};

use rcon_shell_core::{CommandResult, ConnectionConfig, Result, RetryPolicy};

use crate::session::Session;
use crate::transport::Dialer;

/// Run a single command against the server.
///
/// Connection failures are returned without retry, and a dropped connection
/// is reported at once since the command would not be resent anyway. The
/// session is closed whether or not the command succeeds.
pub async fn run_once(
    dialer: Arc<dyn Dialer>,
    config: ConnectionConfig,
    command: &str,
) -> Result<CommandResult> {
    let mut session = Session::start_with_policy(config, dialer, RetryPolicy::disabled()).await?;

    let result = session.send_command(command).await;
    match &result {
        Ok(output) => {
            info!("Command \"{}\" sent", command);
            if output.is_empty {
                warn!("Response is empty!");
            }
        }
        Err(e) => {
            error!("Can't send command: command={:?}, error={}", command, e);
        }
    }

    session.close().await;
    result
}
