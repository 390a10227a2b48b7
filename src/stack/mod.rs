// src/stack/mod.rs

//! The stack contract and the four backend adapters behind it.
//!
//! Callers only ever go through [`Stack`]. Which backend sits behind it is
//! chosen once, when the stack is opened, by [`open_stack`].

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::config::Settings;
use crate::errors::Result;
use crate::exec::CommandRunner;
use crate::fs::FileSystem;
use crate::spec::Function;
use crate::types::BackendKind;

pub mod context;
pub mod fission;
pub mod knative;
pub mod kubeless;
pub mod openfaas;

pub use context::StackContext;
pub use fission::FissionStack;
pub use knative::KnativeStack;
pub use kubeless::KubelessStack;
pub use openfaas::OpenFaasStack;

/// Future returned by [`Stack::deploy_stack`] and [`Stack::remove_stack`].
pub type StackFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// What every backend exposes, and all a caller may rely on.
///
/// `deploy_stack` stops at the first failing command and leaves whatever it
/// already created in place. Running it again on a half-deployed stack may
/// fail on name collisions; that error is returned as is.
///
/// `remove_stack` tries every deletion even when earlier ones fail.
pub trait Stack: Send + Sync {
    fn deploy_stack(&self) -> StackFuture<'_>;
    fn remove_stack(&self) -> StackFuture<'_>;
    fn stack_id(&self) -> &str;
    fn project(&self) -> &str;
    fn stage(&self) -> &str;
}

/// A stack on one of the supported backends.
#[derive(Debug)]
pub enum AnyStack<R> {
    Fission(FissionStack<R>),
    Knative(KnativeStack<R>),
    Kubeless(KubelessStack<R>),
    OpenFaas(OpenFaasStack<R>),
}

impl<R: CommandRunner> AnyStack<R> {
    pub fn kind(&self) -> BackendKind {
        match self {
            AnyStack::Fission(_) => BackendKind::Fission,
            AnyStack::Knative(_) => BackendKind::Knative,
            AnyStack::Kubeless(_) => BackendKind::Kubeless,
            AnyStack::OpenFaas(_) => BackendKind::OpenFaas,
        }
    }

    /// Monitored functions, in the order they are created and probed.
    pub fn functions(&self) -> &[Function] {
        self.context().functions()
    }

    fn context(&self) -> &StackContext<R> {
        match self {
            AnyStack::Fission(stack) => stack.context(),
            AnyStack::Knative(stack) => stack.context(),
            AnyStack::Kubeless(stack) => stack.context(),
            AnyStack::OpenFaas(stack) => stack.context(),
        }
    }
}

impl<R: CommandRunner> Stack for AnyStack<R> {
    fn deploy_stack(&self) -> StackFuture<'_> {
        match self {
            AnyStack::Fission(stack) => stack.deploy_stack(),
            AnyStack::Knative(stack) => stack.deploy_stack(),
            AnyStack::Kubeless(stack) => stack.deploy_stack(),
            AnyStack::OpenFaas(stack) => stack.deploy_stack(),
        }
    }

    fn remove_stack(&self) -> StackFuture<'_> {
        match self {
            AnyStack::Fission(stack) => stack.remove_stack(),
            AnyStack::Knative(stack) => stack.remove_stack(),
            AnyStack::Kubeless(stack) => stack.remove_stack(),
            AnyStack::OpenFaas(stack) => stack.remove_stack(),
        }
    }

    fn stack_id(&self) -> &str {
        self.context().id()
    }

    fn project(&self) -> &str {
        &self.context().info().project
    }

    fn stage(&self) -> &str {
        &self.context().info().stage
    }
}

/// Load the stack in `dir` for backend `kind`.
///
/// Both documents are read up front; a missing or malformed one fails here
/// and nothing is returned.
pub fn open_stack<R: CommandRunner>(
    kind: BackendKind,
    fs: &dyn FileSystem,
    dir: impl Into<PathBuf>,
    runner: R,
    settings: &Settings,
) -> Result<AnyStack<R>> {
    let dir = dir.into();
    let stack = match kind {
        BackendKind::Fission => AnyStack::Fission(FissionStack::open(fs, dir, runner, settings)?),
        BackendKind::Knative => AnyStack::Knative(KnativeStack::open(fs, dir, runner, settings)?),
        BackendKind::Kubeless => {
            AnyStack::Kubeless(KubelessStack::open(fs, dir, runner, settings)?)
        }
        BackendKind::OpenFaas => {
            AnyStack::OpenFaas(OpenFaasStack::open(fs, dir, runner, settings)?)
        }
    };
    Ok(stack)
}
