// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `steamdeploy`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "steamdeploy",
    version,
    about = "Upload an application build to Steam through steamcmd.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Steamdeploy.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Steamdeploy.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STEAMDEPLOY_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Install steamcmd if needed, stage the application and run the build.
    Deploy {
        /// Validate and print what would be deployed, without running anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Only make sure steamcmd is installed and prepared.
    Install,
    /// Log in once and quit, e.g. to cache a session or answer Steam Guard.
    Login,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
