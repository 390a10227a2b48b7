// src/stack/context.rs

//! State and plumbing every backend adapter shares: identity, working
//! directory, runner, poller and platform settings.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::PlatformSettings;
use crate::engine::{Readiness, ReadinessPoller, ReadinessProbe};
use crate::errors::Result;
use crate::exec::{CommandError, CommandOutput, CommandRunner, Invocation};
use crate::spec::{Function, StackInfo};

/// Status string Kubernetes conditions report once satisfied.
const CONDITION_TRUE: &str = "True";

#[derive(Debug)]
pub struct StackContext<R> {
    info: StackInfo,
    dir: PathBuf,
    runner: R,
    poller: ReadinessPoller,
    platform: PlatformSettings,
    functions: Vec<Function>,
}

impl<R: CommandRunner> StackContext<R> {
    pub fn new(
        info: StackInfo,
        dir: PathBuf,
        runner: R,
        poller: ReadinessPoller,
        platform: PlatformSettings,
        functions: Vec<Function>,
    ) -> Self {
        Self {
            info,
            dir,
            runner,
            poller,
            platform,
            functions,
        }
    }

    pub fn info(&self) -> &StackInfo {
        &self.info
    }

    pub fn id(&self) -> &str {
        &self.info.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn function_names(&self) -> Vec<String> {
        self.functions.iter().map(|f| f.name.clone()).collect()
    }

    /// A command run from the stack directory.
    pub fn command(&self, program: &str) -> Invocation {
        Invocation::new(program).current_dir(&self.dir)
    }

    /// A platform CLI command; the kubeconfig travels as `KUBECONFIG`.
    pub fn platform_cli(&self, program: &str) -> Invocation {
        let invocation = self.command(program);
        match &self.platform.kubeconfig {
            Some(path) => invocation.env("KUBECONFIG", path.display().to_string()),
            None => invocation,
        }
    }

    /// A `kubectl` command; the kubeconfig travels as `--kubeconfig`.
    pub fn kubectl<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = self.command("kubectl").args(args);
        match &self.platform.kubeconfig {
            Some(path) => invocation.flag("--kubeconfig", path.display().to_string()),
            None => invocation,
        }
    }

    /// Run a deploy step. Any failure aborts the caller via `?`.
    pub async fn run(&self, invocation: Invocation) -> Result<CommandOutput> {
        Ok(self.runner.run(invocation).await?)
    }

    /// Run a teardown step and hand back the raw outcome for bookkeeping.
    pub async fn try_run(
        &self,
        invocation: Invocation,
    ) -> std::result::Result<CommandOutput, CommandError> {
        self.runner.run(invocation).await
    }

    /// Probe a condition through `kubectl ... -o jsonpath=...`; ready when
    /// the printed status is `True`.
    pub async fn condition_status(
        &self,
        invocation: Invocation,
    ) -> std::result::Result<Readiness, CommandError> {
        let output = self.runner.run(invocation).await?;
        Ok(Readiness::from(output.stdout == CONDITION_TRUE))
    }

    pub async fn wait_until_ready<P>(&self, probe: &P, functions: &[String]) -> Result<u64>
    where
        P: ReadinessProbe + ?Sized,
    {
        self.poller
            .wait_until_ready(self.id(), probe, functions)
            .await
    }

    /// Fixed pause after a deploy for whatever the probes do not cover.
    pub async fn settle(&self) {
        let settle = self.platform.settle;
        if settle.is_zero() {
            return;
        }
        info!(stack = %self.id(), ?settle, "waiting for platform to settle");
        tokio::time::sleep(settle).await;
    }
}
