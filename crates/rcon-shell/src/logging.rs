//! Process-wide logging setup.

use tracing_subscriber::EnvFilter;

/// Pick the log filter: an explicit level wins, then `RUST_LOG`, then the
/// configured default.
pub fn filter(explicit: Option<&str>, configured: &str) -> anyhow::Result<EnvFilter> {
    match explicit {
        Some(level) => Ok(EnvFilter::try_new(level)?),
        None => Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(configured))?),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// the prompt and server responses.
pub fn init(filter: EnvFilter) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level() {
        let filter = filter(Some("debug"), "info").unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_invalid_explicit_level() {
        assert!(filter(Some("rcon_shell=notalevel"), "info").is_err());
    }
}
