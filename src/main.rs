// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Shotlog CLI - shot list entry and dashboard for film production

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use shotlog::commands::{self, add::AddArgs, Output};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shotlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "SHOTLOG_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive dashboard
    View {
        /// Keep shots in memory instead of the configured backend
        #[arg(long)]
        offline: bool,
    },

    /// Add a shot from the command line
    Add(AddArgs),

    /// List stored shots
    List,

    /// Show permitted values for categorical fields
    Taxonomy {
        /// Field to show (e.g. shot_size); all fields if omitted
        field: Option<String>,
    },

    /// Show effective configuration
    Config {
        /// Dotted key to print (e.g. gateway.table)
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

/// Where log lines go for a given invocation
#[derive(Debug, PartialEq)]
enum LogSink {
    Stderr,
    /// The TUI owns the terminal, so logs go to a file
    File(std::path::PathBuf),
    Off,
}

fn log_sink(cli: &Cli, log_file: Option<std::path::PathBuf>) -> LogSink {
    match (&cli.command, log_file) {
        (Commands::View { .. }, Some(path)) => LogSink::File(path),
        (Commands::View { .. }, None) => LogSink::Off,
        _ => LogSink::Stderr,
    }
}

fn log_level<'a>(cli: &Cli, config_level: &'a str) -> &'a str {
    match cli.verbose {
        0 if cli.quiet => "error",
        0 => config_level,
        1 => "debug",
        _ => "trace",
    }
}

fn init_logging(cli: &Cli, config_level: &str) {
    let level = log_level(cli, config_level);
    let filter = if cli.verbose == 0 && !cli.quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let file = match log_sink(cli, shotlog::config::log_path()) {
        LogSink::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            return;
        }
        LogSink::Off => return,
        LogSink::File(path) => path,
    };

    let opened = file
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&file)
        });
    // No terminal fallback while the alternate screen is up
    if let Ok(handle) = opened {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(handle))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = shotlog::config::load(cli.config.as_deref())?;
    init_logging(&cli, &config.log_level);
    tracing::debug!(
        table = %config.gateway.table,
        bucket = %config.gateway.bucket,
        has_url = config.gateway.url.is_some(),
        "Loaded configuration"
    );

    let out = Output {
        json: cli.json,
        color: !cli.no_color && !cli.json,
    };

    // Execute command
    match &cli.command {
        Commands::View { offline } => commands::view::run(&config, *offline).await,
        Commands::Add(args) => commands::add::run(args, &config, out).await,
        Commands::List => commands::list::run(&config, out).await,
        Commands::Taxonomy { field } => commands::taxonomy::run(field.as_deref(), out),
        Commands::Config { key } => commands::config::run(&config, key.as_deref()),
        Commands::Completions { shell } => commands::completions::run(*shell, &mut Cli::command()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("shotlog").chain(args.iter().copied()))
    }

    #[test]
    fn test_view_never_logs_to_stderr() {
        let file = PathBuf::from("/tmp/shotlog.log");
        assert_eq!(
            log_sink(&cli(&["view"]), Some(file.clone())),
            LogSink::File(file.clone())
        );
        assert_eq!(
            log_sink(&cli(&["-vv", "view", "--offline"]), Some(file.clone())),
            LogSink::File(file)
        );
        assert_eq!(log_sink(&cli(&["view"]), None), LogSink::Off);
    }

    #[test]
    fn test_batch_commands_log_to_stderr() {
        let file = Some(PathBuf::from("/tmp/shotlog.log"));
        assert_eq!(log_sink(&cli(&["list"]), file.clone()), LogSink::Stderr);
        assert_eq!(log_sink(&cli(&["taxonomy"]), file), LogSink::Stderr);
    }

    #[test]
    fn test_log_level_from_flags() {
        assert_eq!(log_level(&cli(&["list"]), "info"), "info");
        assert_eq!(log_level(&cli(&["-q", "list"]), "info"), "error");
        assert_eq!(log_level(&cli(&["-v", "view"]), "info"), "debug");
        assert_eq!(log_level(&cli(&["-vv", "list"]), "info"), "trace");
    }
}
