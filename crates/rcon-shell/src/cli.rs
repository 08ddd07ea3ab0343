//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use rcon_shell_core::{ClientConfig, Result};

/// Source RCON shell: run one command or open an interactive session
#[derive(Debug, Parser)]
#[command(name = "rcon-shell")]
#[command(author, version, about = "Source RCON client with automatic reconnection")]
pub struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Server host name or IP address
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Server RCON port
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// RCON password
    #[arg(short = 'P', long, env = "RCON_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Enable Minecraft protocol quirks
    #[arg(long)]
    pub minecraft: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Command to run once; starts an interactive shell when omitted
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Load the configuration file (or defaults) and apply flag overrides.
    pub fn resolve_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(password) = &self.password {
            config.server.password = password.clone();
        }
        if self.minecraft {
            config.client.minecraft_quirks = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// The single-shot command, if one was given.
    pub fn single_command(&self) -> Option<String> {
        (!self.command.is_empty()).then(|| self.command.join(" "))
    }
}
