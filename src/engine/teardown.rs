// src/engine/teardown.rs

//! Best-effort teardown bookkeeping.
//!
//! Deploys stop at the first failed command. Teardowns do not: every
//! deletion is attempted no matter what happened before it. `Teardown`
//! collects the outcome of each step so the caller can keep going and decide
//! at the end what (if anything) to report.

use tracing::{info, warn};

use crate::errors::{Result, StackError};
use crate::exec::{CommandError, CommandOutput};

/// One deletion step that did not succeed.
#[derive(Debug)]
pub struct FailedStep {
    pub step: String,
    pub error: CommandError,
}

#[derive(Debug)]
pub struct Teardown {
    stack: String,
    attempted: usize,
    swallowed: Vec<FailedStep>,
    surfaced: Option<FailedStep>,
}

impl Teardown {
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            attempted: 0,
            swallowed: Vec::new(),
            surfaced: None,
        }
    }

    /// Record a step whose failure is logged and otherwise ignored.
    pub fn attempt(
        &mut self,
        step: impl Into<String>,
        outcome: std::result::Result<CommandOutput, CommandError>,
    ) {
        self.attempted += 1;
        let step = step.into();
        match outcome {
            Ok(_) => info!(stack = %self.stack, step = %step, "removed"),
            Err(error) => {
                warn!(
                    stack = %self.stack,
                    step = %step,
                    error = %error,
                    "teardown step failed; continuing"
                );
                self.swallowed.push(FailedStep { step, error });
            }
        }
    }

    /// Record a step whose failure is reported by [`Teardown::finish`].
    ///
    /// If several checked steps fail, the last one wins.
    pub fn checked(
        &mut self,
        step: impl Into<String>,
        outcome: std::result::Result<CommandOutput, CommandError>,
    ) {
        self.attempted += 1;
        let step = step.into();
        match outcome {
            Ok(_) => info!(stack = %self.stack, step = %step, "removed"),
            Err(error) => {
                warn!(stack = %self.stack, step = %step, error = %error, "teardown step failed");
                if let Some(previous) = self.surfaced.replace(FailedStep { step, error }) {
                    self.swallowed.push(previous);
                }
            }
        }
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Failures that will not be reported to the caller.
    pub fn swallowed(&self) -> &[FailedStep] {
        &self.swallowed
    }

    /// Log a summary and return the surfaced error, if any.
    pub fn finish(self) -> Result<()> {
        if !self.swallowed.is_empty() {
            let steps: Vec<&str> = self.swallowed.iter().map(|f| f.step.as_str()).collect();
            warn!(
                stack = %self.stack,
                attempted = self.attempted,
                failed = ?steps,
                "teardown finished with ignored failures"
            );
        } else {
            info!(stack = %self.stack, attempted = self.attempted, "teardown finished");
        }

        match self.surfaced {
            Some(failed) => Err(StackError::Command(failed.error)),
            None => Ok(()),
        }
    }
}
