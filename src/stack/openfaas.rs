// src/stack/openfaas.rs

//! OpenFaaS: `faas-cli` deploys the whole stack file against the gateway.
//! Functions with an `autoscaling` block get a horizontal pod autoscaler.

use std::path::PathBuf;

use tracing::info;

use super::context::StackContext;
use super::{Stack, StackFuture};
use crate::config::Settings;
use crate::engine::{ProbeFuture, Readiness, ReadinessProbe, Teardown};
use crate::errors::Result;
use crate::exec::{CommandRunner, Invocation};
use crate::fs::FileSystem;
use crate::spec::StackInfo;
use crate::spec::openfaas::{Autoscaling, NamedFunction, OpenFaasSpec, SPEC_FILE};

const FAAS_CLI: &str = "faas-cli";

/// Marker `faas-cli describe` prints while replicas are still coming up.
const NOT_READY: &str = "Not Ready";

#[derive(Debug)]
pub struct OpenFaasStack<R> {
    ctx: StackContext<R>,
    entries: Vec<NamedFunction>,
    gateway: String,
    function_namespace: String,
}

impl<R: CommandRunner> OpenFaasStack<R> {
    pub fn open(
        fs: &dyn FileSystem,
        dir: impl Into<PathBuf>,
        runner: R,
        settings: &Settings,
    ) -> Result<Self> {
        let dir = dir.into();
        let info = StackInfo::load(fs, &dir)?;
        let entries = OpenFaasSpec::load(fs, &dir)?.into_named_functions();
        let functions = entries.iter().map(NamedFunction::summary).collect();

        Ok(Self {
            ctx: StackContext::new(
                info,
                dir,
                runner,
                settings.polling.into(),
                settings.openfaas.platform.clone(),
                functions,
            ),
            entries,
            gateway: settings.openfaas.gateway.clone(),
            function_namespace: settings.openfaas.function_namespace.clone(),
        })
    }

    pub fn context(&self) -> &StackContext<R> {
        &self.ctx
    }

    async fn deploy(&self) -> Result<()> {
        info!(stack = %self.ctx.id(), gateway = %self.gateway, "deploying openfaas stack");
        self.ctx
            .run(self.faas_cli("deploy").flag("-f", SPEC_FILE))
            .await?;

        for entry in &self.entries {
            if let Some(autoscaling) = &entry.function.autoscaling {
                info!(stack = %self.ctx.id(), function = %entry.name, "attaching autoscaler");
                self.ctx
                    .run(self.create_autoscaler(&entry.name, autoscaling))
                    .await?;
            }
        }

        let names = self.ctx.function_names();
        self.ctx.wait_until_ready(self, &names).await?;

        self.ctx.settle().await;
        info!(stack = %self.ctx.id(), "openfaas stack deployed");
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        info!(stack = %self.ctx.id(), "removing openfaas stack");
        let mut teardown = Teardown::new(self.ctx.id());

        for entry in self.entries.iter().filter(|e| e.function.autoscaling.is_some()) {
            let name = entry.name.as_str();
            let outcome = self
                .ctx
                .try_run(self.ctx.kubectl([
                    "delete",
                    "hpa",
                    "-n",
                    self.function_namespace.as_str(),
                    name,
                ]))
                .await;
            teardown.attempt(format!("autoscaler {name}"), outcome);
        }

        let outcome = self
            .ctx
            .try_run(self.faas_cli("remove").flag("-f", SPEC_FILE))
            .await;
        teardown.checked("functions", outcome);

        teardown.finish()
    }

    /// `faas-cli <subcommand> -g <gateway>`.
    fn faas_cli(&self, subcommand: &str) -> Invocation {
        self.ctx
            .command(FAAS_CLI)
            .arg(subcommand)
            .flag("-g", &self.gateway)
    }

    fn create_autoscaler(&self, name: &str, autoscaling: &Autoscaling) -> Invocation {
        self.ctx.kubectl([
            "autoscale",
            "deployment",
            "-n",
            self.function_namespace.as_str(),
            name,
            "--cpu-percent",
            autoscaling.target_cpu.as_str(),
            "--min",
            autoscaling.min.as_str(),
            "--max",
            autoscaling.max.as_str(),
        ])
    }
}

impl<R: CommandRunner> ReadinessProbe for OpenFaasStack<R> {
    fn probe<'a>(&'a self, function: &'a str) -> ProbeFuture<'a> {
        Box::pin(async move {
            let output = self
                .ctx
                .try_run(self.faas_cli("describe").arg(function))
                .await?;
            Ok(Readiness::from(!output.stdout.contains(NOT_READY)))
        })
    }
}

impl<R: CommandRunner> Stack for OpenFaasStack<R> {
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
