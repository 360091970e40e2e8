//! Generate config command

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;

/// Print the sample configuration, or write it to `output_path`.
pub fn config_generate(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let Some(path) = output_path else {
        print!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    // 文件已存在且未指定 --force 时交互确认
    if !force && Path::new(&path).exists() {
        print!(
            "{} {} {}",
            "File already exists:".yellow(),
            path.blue(),
            "Overwrite? [y/N] ".yellow()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", "Aborted.".red());
            return Ok(());
        }
    }

    StaticConfig::default().save_to_file(&path).map_err(|e| {
        CliError::CommandError(format!("Unable to write configuration file: {}", e))
    })?;

    println!(
        "  {} {}",
        "Configuration file generated:".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Provider tokens can also be supplied as IPINFO_TOKEN, IPDATA_TOKEN, IPGEO_TOKEN, IP2LOCATION_TOKEN"
            .dimmed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path_str = path.to_str().unwrap().to_string();

        config_generate(Some(path_str.clone()), true).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: StaticConfig = toml::from_str(&written).unwrap();
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.routes.query_prefixes, vec!["query", "ip"]);
    }
}
