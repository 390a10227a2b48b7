// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod spec;
pub mod stack;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::load_settings;
use crate::exec::{CommandRunner, ProcessRunner};
use crate::fs::RealFileSystem;
use crate::stack::{AnyStack, Stack, open_stack};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading
/// - the process runner
/// - opening the stack for the chosen backend
/// - the requested stack operation
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    debug!(?settings, "settings loaded");

    let target = args.command.stack();
    let runner = ProcessRunner::new(settings.runner.echo_output);
    let stack = open_stack(
        target.backend,
        &RealFileSystem,
        target.dir.clone(),
        runner,
        &settings,
    )?;

    match &args.command {
        Command::Deploy(_) => {
            stack.deploy_stack().await?;
            info!(stack = %stack.stack_id(), backend = %stack.kind(), "deploy finished");
        }
        Command::Remove(_) => {
            stack.remove_stack().await?;
            info!(stack = %stack.stack_id(), backend = %stack.kind(), "remove finished");
        }
        Command::Info(_) => print_info(&stack),
    }

    Ok(())
}

/// Print the stack's identity and the functions it monitors.
fn print_info<R: CommandRunner>(stack: &AnyStack<R>) {
    println!("stack:   {}", stack.stack_id());
    println!("project: {}", stack.project());
    println!("stage:   {}", stack.stage());
    println!("backend: {}", stack.kind());
    println!();

    let functions = stack.functions();
    println!("functions ({}):", functions.len());
    for function in functions {
        println!("  - {}", function.name);
        if !function.runtime.is_empty() {
            println!("      runtime: {}", function.runtime);
        }
        if !function.handler.is_empty() {
            println!("      handler: {}", function.handler);
        }
        if !function.memory.is_empty() {
            println!("      memory: {}", function.memory);
        }
        if !function.description.is_empty() {
            println!("      description: {}", function.description);
        }
    }
}
