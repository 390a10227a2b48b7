// src/stack/knative.rs

//! Knative: the whole manifest goes through one `kubectl apply`, after which
//! every service is polled until its `Ready` condition holds.

use std::path::PathBuf;

use tracing::info;

use super::context::StackContext;
use super::{Stack, StackFuture};
use crate::config::Settings;
use crate::engine::{ProbeFuture, ReadinessProbe, Teardown};
use crate::errors::Result;
use crate::exec::CommandRunner;
use crate::fs::FileSystem;
use crate::spec::StackInfo;
use crate::spec::knative::{SERVICE_FILE, load_services};

#[derive(Debug)]
pub struct KnativeStack<R> {
    ctx: StackContext<R>,
}

impl<R: CommandRunner> KnativeStack<R> {
    pub fn open(
        fs: &dyn FileSystem,
        dir: impl Into<PathBuf>,
        runner: R,
        settings: &Settings,
    ) -> Result<Self> {
        let dir = dir.into();
        let info = StackInfo::load(fs, &dir)?;
        let functions = load_services(fs, &dir)?;

        Ok(Self {
            ctx: StackContext::new(
                info,
                dir,
                runner,
                settings.polling.into(),
                settings.knative.clone(),
                functions,
            ),
        })
    }

    pub fn context(&self) -> &StackContext<R> {
        &self.ctx
    }

    async fn deploy(&self) -> Result<()> {
        info!(stack = %self.ctx.id(), "deploying knative stack");
        self.ctx
            .run(self.ctx.kubectl(["apply", "-f", SERVICE_FILE]))
            .await?;

        let names = self.ctx.function_names();
        self.ctx.wait_until_ready(self, &names).await?;

        self.ctx.settle().await;
        info!(stack = %self.ctx.id(), "knative stack deployed");
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        info!(stack = %self.ctx.id(), "removing knative stack");
        let mut teardown = Teardown::new(self.ctx.id());

        let outcome = self
            .ctx
            .try_run(self.ctx.kubectl(["delete", "-f", SERVICE_FILE]))
            .await;
        teardown.checked("services", outcome);

        teardown.finish()
    }
}

impl<R: CommandRunner> ReadinessProbe for KnativeStack<R> {
    fn probe<'a>(&'a self, function: &'a str) -> ProbeFuture<'a> {
        Box::pin(async move {
            let invocation = self.ctx.kubectl([
                "get",
                "ksvc",
                function,
                "-o",
                "jsonpath={.status.conditions[1].status}",
            ]);
            self.ctx.condition_status(invocation).await
        })
    }
}

impl<R: CommandRunner> Stack for KnativeStack<R> {
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
