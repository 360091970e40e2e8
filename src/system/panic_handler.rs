//! Panic handler
//!
//! Every panic is appended to `crash.log`. The server prints a detailed colored report;
//! the CLI prints one line. Handler panics inside the server are additionally turned
//! into 502 responses by the dispatcher, so the process keeps serving.

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;

const CRASH_LOG: &str = "crash.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Cli,
}

pub fn install_panic_hook(mode: RunMode) {
    panic::set_hook(Box::new(move |panic_info| {
        let payload = panic_info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        let backtrace = std::backtrace::Backtrace::force_capture();
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

        if let Err(e) = write_crash_log(&timestamp, &message, &location, &backtrace) {
            eprintln!("Failed to write crash log: {}", e);
        }

        match mode {
            RunMode::Server => display_server_panic(&message, &location, &backtrace),
            RunMode::Cli => display_simple_panic(&message),
        }
    }));
}

fn display_server_panic(message: &str, location: &str, backtrace: &std::backtrace::Backtrace) {
    use colored::Colorize;

    let rule = "═══════════════════════════════════════════════════";
    eprintln!();
    eprintln!("{}", rule.red().bold());
    eprintln!("{}", "PANIC".red().bold());
    eprintln!("{}", rule.red().bold());
    eprintln!("{} {}", "Reason:".yellow().bold(), message.white());
    eprintln!("{} {}", "Location:".yellow().bold(), location.white());
    eprintln!();
    eprintln!("{}", "Backtrace:".yellow().bold());
    eprintln!("{}", format!("{:?}", backtrace).dimmed());
    eprintln!("{}", format!("Details saved to {}", CRASH_LOG).cyan());
    eprintln!("{}", rule.red().bold());
    eprintln!();
}

fn display_simple_panic(message: &str) {
    eprintln!();
    eprintln!("Program panicked: {}", message);
    eprintln!("Details saved to {}", CRASH_LOG);
    eprintln!();
}

fn write_crash_log(
    timestamp: &str,
    message: &str,
    location: &str,
    backtrace: &std::backtrace::Backtrace,
) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(CRASH_LOG)?;

    writeln!(file, "==========================================")?;
    writeln!(file, "Crash Report - {}", timestamp)?;
    writeln!(file, "==========================================")?;
    writeln!(file, "Message: {}", message)?;
    writeln!(file, "Location: {}", location)?;
    writeln!(file, "\nBacktrace:")?;
    writeln!(file, "{:?}", backtrace)?;
    writeln!(file, "==========================================\n")?;

    Ok(())
}
