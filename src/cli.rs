// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `assetpipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "assetpipe",
    version,
    about = "Build front-end assets through a task graph with watch support.",
    long_about = None
)]
pub struct CliArgs {
    /// Pipeline or task to run (`default`, `build`, `deploy`, `watch`, or
    /// any registered task name).
    #[arg(value_name = "TASK", default_value = "default")]
    pub task: String,

    /// Path to the base config file (TOML, may contain `<%= var %>`
    /// placeholders).
    #[arg(long, value_name = "PATH", default_value = "Assetpipe.toml")]
    pub config: String,

    /// Path to the substitution-variables file (TOML).
    #[arg(long, value_name = "PATH", default_value = "assetpipe.vars.toml")]
    pub vars: String,

    /// Disable desktop notifications for task failures.
    #[arg(long)]
    pub no_notify: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASSETPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve config and print the schedule, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
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
