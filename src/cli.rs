//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Edge IP geolocation router
#[derive(Parser)]
#[command(name = "geoip-router")]
#[command(version)]
#[command(
    about = "Answers \"what is my IP\" and resolves IP geolocation through upstream providers",
    long_about = None
)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Resolve one address through a provider and print the normalized record
    Resolve {
        /// cf, ipinfo, ipdata, ipgeo or ip2location
        provider: String,
        /// IPv4 or IPv6 address
        ip: String,
    },

    /// Show which handler a request path is routed to
    Route {
        /// Request path, e.g. /query/8.8.8.8
        path: String,

        /// User-Agent to classify (only matters for /)
        #[arg(long)]
        ua: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print a sample configuration, or write it to a file
    Generate {
        /// Output path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["geoip-router"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["geoip-router", "serve", "-c", "/etc/router.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));
        assert_eq!(cli.config.as_deref(), Some("/etc/router.toml"));
    }

    #[test]
    fn test_resolve_and_route() {
        let cli = Cli::try_parse_from(["geoip-router", "resolve", "ipinfo", "8.8.8.8"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Resolve {
                provider: "ipinfo".to_string(),
                ip: "8.8.8.8".to_string()
            })
        );

        let cli = Cli::try_parse_from(["geoip-router", "route", "/", "--ua", "curl/8.4.0"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Route {
                path: "/".to_string(),
                ua: Some("curl/8.4.0".to_string())
            })
        );
    }

    #[test]
    fn test_config_generate() {
        let cli = Cli::try_parse_from(["geoip-router", "config", "generate", "-o", "out.toml"])
            .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output: Some("out.toml".to_string()),
                    force: false
                }
            })
        );
    }
}
