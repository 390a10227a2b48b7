// src/stack/fission.rs

//! Fission: environments are created first, then each of their functions
//! together with an HTTP route. Every function is waited on right after its
//! route exists, before the next one is created.

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
use crate::spec::StackInfo;
use crate::spec::fission::{Environment, FissionFunction, FissionSpec};

const FISSION: &str = "fission";

#[derive(Debug)]
pub struct FissionStack<R> {
    ctx: StackContext<R>,
    environments: Vec<Environment>,
    function_namespace: String,
}

impl<R: CommandRunner> FissionStack<R> {
    pub fn open(
        fs: &dyn FileSystem,
        dir: impl Into<PathBuf>,
        runner: R,
        settings: &Settings,
    ) -> Result<Self> {
        let dir = dir.into();
        let info = StackInfo::load(fs, &dir)?;
        let environments = FissionSpec::load(fs, &dir)?.into_environments();
        let functions = environments
            .iter()
            .flat_map(|env| env.functions.iter().map(FissionFunction::summary))
            .collect();

        let ctx = StackContext::new(
            info,
            dir,
            runner,
            settings.polling.into(),
            settings.fission.platform.clone(),
            functions,
        );

        Ok(Self {
            ctx,
            environments,
            function_namespace: settings.fission.function_namespace.clone(),
        })
    }

    pub fn context(&self) -> &StackContext<R> {
        &self.ctx
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    async fn deploy(&self) -> Result<()> {
        info!(stack = %self.ctx.id(), "deploying fission stack");
        self.ctx.run(self.ctx.command("npm").arg("i")).await?;

        for env in &self.environments {
            info!(stack = %self.ctx.id(), environment = %env.spec.name, "creating environment");
            self.ctx.run(self.create_env(env)).await?;

            for function in &env.functions {
                info!(stack = %self.ctx.id(), function = %function.name, "creating function");
                self.ctx.run(self.create_function(&env.spec.name, function)).await?;
                self.ctx.run(self.create_route(&function.name)).await?;
                self.ctx
                    .wait_until_ready(self, slice::from_ref(&function.name))
                    .await?;
            }
        }

        self.ctx.settle().await;
        info!(stack = %self.ctx.id(), "fission stack deployed");
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        info!(stack = %self.ctx.id(), "removing fission stack");
        let mut teardown = Teardown::new(self.ctx.id());

        for env in &self.environments {
            for function in &env.functions {
                let name = &function.name;
                let outcome = self
                    .ctx
                    .try_run(self.fission(["httptrigger", "delete"]).flag("--name", name))
                    .await;
                teardown.attempt(format!("route {name}"), outcome);

                let outcome = self
                    .ctx
                    .try_run(self.fission(["fn", "delete"]).flag("--name", name))
                    .await;
                teardown.attempt(format!("function {name}"), outcome);
            }
        }

        let outcome = self
            .ctx
            .try_run(self.fission(["pkg", "delete", "--orphan"]))
            .await;
        teardown.attempt("orphaned packages", outcome);

        for env in &self.environments {
            let name = &env.spec.name;
            let outcome = self
                .ctx
                .try_run(self.fission(["env", "delete"]).flag("--name", name))
                .await;
            teardown.attempt(format!("environment {name}"), outcome);
        }

        teardown.finish()
    }

    fn fission<const N: usize>(&self, args: [&str; N]) -> Invocation {
        self.ctx.platform_cli(FISSION).args(args)
    }

    fn create_env(&self, env: &Environment) -> Invocation {
        let invocation = self
            .fission(["env", "create"])
            .flag("--name", &env.spec.name)
            .flag("--image", &env.spec.image);
        if env.spec.builder.is_empty() {
            invocation
        } else {
            invocation.flag("--builder", &env.spec.builder)
        }
    }

    fn create_function(&self, env: &str, function: &FissionFunction) -> Invocation {
        let invocation = self
            .fission(["fn", "create"])
            .flag("--name", &function.name)
            .flag("--env", env);

        // Without an entrypoint the handler is plain code; with one it is a
        // source archive that the environment's builder compiles.
        let invocation = if function.entrypoint.is_empty() {
            invocation.flag("--code", &function.handler)
        } else {
            invocation
                .flag("--src", &function.handler)
                .flag("--entrypoint", &function.entrypoint)
        };

        invocation
            .flag("--executortype", "newdeploy")
            .flag("--mincpu", &function.min_cpu)
            .flag("--maxcpu", &function.max_cpu)
            .flag("--minmemory", &function.min_memory)
            .flag("--maxmemory", &function.max_memory)
            .flag("--minscale", &function.min_scale)
            .flag("--maxscale", &function.max_scale)
            .flag("--targetcpu", &function.target_cpu)
    }

    fn create_route(&self, function: &str) -> Invocation {
        self.fission(["route", "create"])
            .flag("--method", "POST")
            .flag("--url", format!("/{function}"))
            .flag("--function", function)
            .flag("--name", function)
    }
}

impl<R: CommandRunner> ReadinessProbe for FissionStack<R> {
    fn probe<'a>(&'a self, function: &'a str) -> ProbeFuture<'a> {
        Box::pin(async move {
            let selector = format!("functionName={function}");
            let invocation = self.ctx.kubectl([
                "get",
                "deploy",
                "-n",
                self.function_namespace.as_str(),
                "-l",
                selector.as_str(),
                "-o",
                "jsonpath={.items[0].status.conditions[0].status}",
            ]);
            self.ctx.condition_status(invocation).await
        })
    }
}

impl<R: CommandRunner> Stack for FissionStack<R> {
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
