// src/stack/kubeless.rs

//! Kubeless: one function at a time. Each function is deployed, waited on,
//! exposed through an HTTP trigger and, if it asks for it, autoscaled.

use std::path::PathBuf;
use std::slice;

use tracing::info;

use super::context::StackContext;
use super::{Stack, StackFuture};
use crate::config::Settings;
use crate::engine::{ProbeFuture, ReadinessProbe, Teardown};
use crate::errors::Result;
use crate::exec::{CommandRunner, Invocation};
use crate::fs::FileSystem;
use crate::spec::kubeless::{KubelessFunction, KubelessSpec};
use crate::spec::{SourceDefaults, StackInfo};

const KUBELESS: &str = "kubeless";

#[derive(Debug)]
pub struct KubelessStack<R> {
    ctx: StackContext<R>,
    hostname: String,
    defaults: SourceDefaults,
    entries: Vec<KubelessFunction>,
}

impl<R: CommandRunner> KubelessStack<R> {
    pub fn open(
        fs: &dyn FileSystem,
        dir: impl Into<PathBuf>,
        runner: R,
        settings: &Settings,
    ) -> Result<Self> {
        let dir = dir.into();
        let info = StackInfo::load(fs, &dir)?;
        let spec = KubelessSpec::load(fs, &dir)?;
        let entries = spec.ordered_functions();
        let functions = entries.iter().map(KubelessFunction::summary).collect();

        Ok(Self {
            ctx: StackContext::new(
                info,
                dir,
                runner,
                settings.polling.into(),
                settings.kubeless.clone(),
                functions,
            ),
            hostname: spec.hostname.clone(),
            defaults: spec.defaults(),
            entries,
        })
    }

    pub fn context(&self) -> &StackContext<R> {
        &self.ctx
    }

    /// Source settings `function` is deployed with: its own where set, the
    /// stack's otherwise.
    pub fn resolved_source(&self, function: &KubelessFunction) -> SourceDefaults {
        self.defaults.overlay(&function.overrides())
    }

    async fn deploy(&self) -> Result<()> {
        info!(stack = %self.ctx.id(), "deploying kubeless stack");
        self.ctx.run(self.ctx.command("npm").arg("i")).await?;

        for function in &self.entries {
            let name = &function.name;
            info!(stack = %self.ctx.id(), function = %name, "deploying function");
            self.ctx.run(self.deploy_function(function)).await?;
            self.ctx
                .wait_until_ready(self, slice::from_ref(name))
                .await?;

            self.ctx.run(self.create_trigger(function)).await?;

            if function.is_autoscaled() {
                self.ctx.run(self.create_autoscaler(function)).await?;
            }
        }

        self.ctx.settle().await;
        info!(stack = %self.ctx.id(), "kubeless stack deployed");
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        info!(stack = %self.ctx.id(), "removing kubeless stack");
        let mut teardown = Teardown::new(self.ctx.id());

        for function in &self.entries {
            let name = function.name.as_str();

            if function.is_autoscaled() {
                let outcome = self
                    .ctx
                    .try_run(self.kubeless(["autoscale", "delete", name]))
                    .await;
                teardown.attempt(format!("autoscaler {name}"), outcome);
            }

            let outcome = self
                .ctx
                .try_run(self.kubeless(["trigger", "http", "delete", name]))
                .await;
            teardown.attempt(format!("trigger {name}"), outcome);

            let outcome = self
                .ctx
                .try_run(self.kubeless(["function", "delete", name]))
                .await;
            teardown.attempt(format!("function {name}"), outcome);
        }

        teardown.finish()
    }

    fn kubeless<const N: usize>(&self, args: [&str; N]) -> Invocation {
        self.ctx.platform_cli(KUBELESS).args(args)
    }

    fn deploy_function(&self, function: &KubelessFunction) -> Invocation {
        let source = self.resolved_source(function);
        let invocation = self
            .kubeless(["function", "deploy", function.name.as_str()])
            .flag("-r", &function.runtime)
            .flag("-f", source.file)
            .flag("--handler", &function.handler)
            .flag("--cpu", &function.cpu)
            .flag("--memory", &function.memory);

        let invocation = if source.dependencies.is_empty() {
            invocation
        } else {
            invocation.flag("--dependencies", source.dependencies)
        };

        if source.env.is_empty() {
            invocation
        } else {
            invocation.flag("--env", source.env)
        }
    }

    fn create_trigger(&self, function: &KubelessFunction) -> Invocation {
        let name = function.name.as_str();
        self.kubeless(["trigger", "http", "create", name])
            .flag("--function-name", name)
            .flag("--hostname", &self.hostname)
            .flag("--path", &function.path)
    }

    fn create_autoscaler(&self, function: &KubelessFunction) -> Invocation {
        self.kubeless(["autoscale", "create", function.name.as_str()])
            .flag("--metric", "cpu")
            .flag("--min", &function.min_scale)
            .flag("--max", &function.max_scale)
            .flag("--value", &function.target_cpu)
    }
}

impl<R: CommandRunner> ReadinessProbe for KubelessStack<R> {
    fn probe<'a>(&'a self, function: &'a str) -> ProbeFuture<'a> {
        Box::pin(async move {
            let selector = format!("function={function}");
            let invocation = self.ctx.kubectl([
                "get",
                "pods",
                "-l",
                selector.as_str(),
                "-o",
                "jsonpath={.items[0].status.conditions[1].status}",
            ]);
            self.ctx.condition_status(invocation).await
        })
    }
}

impl<R: CommandRunner> Stack for KubelessStack<R> {
    fn deploy_stack(&self) -> StackFuture<'_> {
        Box::pin(self.deploy())
    }

    fn remove_stack(&self) -> StackFuture<'_> {
        Box::pin(self.remove())
    }

    fn stack_id(&self) -> &str {
        self.ctx.id()
    }

    fn project(&self) -> &str {
        &self.ctx.info().project
    }

    fn stage(&self) -> &str {
        &self.ctx.info().stage
    }
}
