use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;
use crate::router::RouteTable;

/// Print the routing decision for `path`.
pub fn show_route(config: &StaticConfig, path: &str, user_agent: Option<&str>) -> Result<(), CliError> {
    let table = RouteTable::from_config(&config.routes)?;
    let decision = table.decide(path, user_agent);
    println!("{} {} {}", path.blue(), "→".dimmed(), decision.to_string().green());
    Ok(())
}
