//! CLI interface module
//!
//! One-shot commands that reuse the server's route table and provider adapters.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::errors::GeoRouterError;

#[derive(Debug)]
pub enum CliError {
    ConfigError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ConfigError(msg) => format!("Config error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::ConfigError(msg) => {
                format!("{} {}", "Config error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<GeoRouterError> for CliError {
    fn from(err: GeoRouterError) -> Self {
        match err {
            GeoRouterError::Config(msg) => CliError::ConfigError(msg),
            GeoRouterError::Validation(msg) => CliError::ParseError(msg),
            other => CliError::CommandError(other.format_simple()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::CommandError(err.to_string())
    }
}

/// Run a clap-parsed one-shot command. `Serve` is handled by the binary, not here.
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    let config = crate::config::get_config();

    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a one-shot command".to_string(),
        )),
        Commands::Resolve { provider, ip } => {
            commands::resolve::resolve(&config, &provider, &ip).await
        }
        Commands::Route { path, ua } => commands::route::show_route(&config, &path, ua.as_deref()),
        Commands::Config {
            action: ConfigCommands::Generate { output, force },
        } => commands::config_gen::config_generate(output, force),
    }
}
