use anyhow::Result;
use clap::Parser;

use geoip_router::cli::{Cli, Commands};
use geoip_router::config::init_config;
use geoip_router::system::{RunMode, init_logging, install_panic_hook};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = init_config(cli.config.as_deref());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            install_panic_hook(RunMode::Server);
            // guard 必须存活到进程结束，否则缓冲的日志会丢失
            let _guard = init_logging(&config.logging)?;
            serve().await
        }
        #[cfg(feature = "cli")]
        cmd => {
            install_panic_hook(RunMode::Cli);
            if let Err(e) = geoip_router::interfaces::cli::run_cli_command(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
        #[cfg(not(feature = "cli"))]
        _ => anyhow::bail!("This build only supports `serve`; enable the `cli` feature"),
    }
}

#[cfg(feature = "server")]
async fn serve() -> Result<()> {
    geoip_router::runtime::modes::run_server().await
}

#[cfg(not(feature = "server"))]
async fn serve() -> Result<()> {
    anyhow::bail!("This build has no HTTP server; enable the `server` feature")
}
