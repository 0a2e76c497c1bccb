//! Inkpost CLI - command-line client for the Inkpost blog API

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{ApiCommands, Commands};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "inkpost")]
#[command(about = "Read, write and discuss posts on an Inkpost blog")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Configuration file (toml, json or yaml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for logs and generated configuration
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "60")]
    timeout: u64,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Api(ApiCommands::Keepalive { .. }) => "keepalive",
        _ => "cli",
    };
    let data_dir = config::data_dir(cli.data_dir);
    logging::init_logging(cli.log_level.into(), &data_dir, component, cli.no_file_log)?;

    info!("Starting Inkpost CLI");

    // keepalive runs until interrupted
    let timeout = match (&cli.command, cli.timeout) {
        (Commands::Api(ApiCommands::Keepalive { .. }), _) | (_, 0) => None,
        (_, secs) => Some(Duration::from_secs(secs)),
    };

    let run = cli.command.execute(cli.config, data_dir);
    let outcome = match timeout {
        None => run.await,
        Some(limit) => match tokio::time::timeout(limit, run).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Command timed out after {} seconds", cli.timeout);
                std::process::exit(1);
            }
        },
    };

    match outcome {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            std::process::exit(1);
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
