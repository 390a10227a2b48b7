// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::BackendKind;

/// Command-line arguments for `faas-stacks`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "faas-stacks",
    version,
    about = "Deploy and remove function stacks on Fission, Knative, Kubeless and OpenFaaS.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the settings file (TOML).
    ///
    /// Default: `faas-stacks.toml` in the current working directory, if it
    /// exists. A path given here must exist.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FAAS_STACKS_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create every resource of the stack and wait until it serves.
    Deploy(StackArgs),
    /// Delete every resource of the stack, carrying on past failures.
    Remove(StackArgs),
    /// Load the stack and print what it contains. Runs nothing.
    Info(StackArgs),
}

impl Command {
    pub fn stack(&self) -> &StackArgs {
        match self {
            Command::Deploy(args) | Command::Remove(args) | Command::Info(args) => args,
        }
    }
}

/// Which stack to act on.
#[derive(Debug, Clone, Args)]
pub struct StackArgs {
    /// Platform the stack targets.
    #[arg(long, value_enum, value_name = "BACKEND")]
    pub backend: BackendKind,

    /// Directory holding `stack.yaml` and the platform document.
    #[arg(value_name = "STACK_DIR")]
    pub dir: PathBuf,
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
