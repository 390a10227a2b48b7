// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! Every stack backend talks to a `CommandRunner` instead of spawning
//! processes itself. Production code uses [`ProcessRunner`]; tests swap in a
//! fake that records invocations and replays scripted output.

use std::future::Future;
use std::pin::Pin;

use super::invocation::{CommandError, CommandOutput, Invocation};
use super::task_runner::run_process;

/// Future returned by [`CommandRunner::run`].
pub type RunFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CommandOutput, CommandError>> + Send + 'a>>;

/// Trait abstracting how an external command is executed.
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion and return its trimmed output.
    ///
    /// A non-zero exit status is an error; the captured stderr travels with it.
    fn run(&self, invocation: Invocation) -> RunFuture<'_>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, invocation: Invocation) -> RunFuture<'_> {
        (**self).run(invocation)
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<T> {
    fn run(&self, invocation: Invocation) -> RunFuture<'_> {
        (**self).run(invocation)
    }
}

/// Runner that spawns real OS processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Mirror child stdout/stderr to our own streams while capturing.
    echo_output: bool,
}

impl ProcessRunner {
    pub fn new(echo_output: bool) -> Self {
        Self { echo_output }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: Invocation) -> RunFuture<'_> {
        let echo_output = self.echo_output;
        Box::pin(async move { run_process(invocation, echo_output).await })
    }
}
