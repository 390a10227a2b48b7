// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`invocation`] describes a command and its captured result.
//! - [`task_runner`] spawns one process and drains both output streams.
//! - [`backend`] provides the `CommandRunner` trait and the production
//!   `ProcessRunner`, which tests replace with a fake.

pub mod backend;
pub mod invocation;
pub mod task_runner;

pub use backend::{CommandRunner, ProcessRunner, RunFuture};
pub use invocation::{CommandError, CommandOutput, Invocation};
