// src/engine/mod.rs

//! Lifecycle engine shared by every stack backend.
//!
//! - [`convergence`] is the pure readiness state machine.
//! - [`poller`] is the async shell that sleeps and probes around it.
//! - [`teardown`] collects per-step outcomes for best-effort removal.

use std::future::Future;
use std::pin::Pin;

use crate::exec::CommandError;

pub mod convergence;
pub mod poller;
pub mod teardown;

pub use convergence::{Convergence, ScanStep};
pub use poller::ReadinessPoller;
pub use teardown::{FailedStep, Teardown};

/// Observed state of one monitored function.
///
/// A probe that fails to run is not "not ready"; it is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady,
}

impl Readiness {
    pub fn is_ready(self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

impl From<bool> for Readiness {
    fn from(ready: bool) -> Self {
        if ready {
            Readiness::Ready
        } else {
            Readiness::NotReady
        }
    }
}

/// Future returned by [`ReadinessProbe::probe`].
pub type ProbeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Readiness, CommandError>> + Send + 'a>>;

/// External status query for a deployed function.
pub trait ReadinessProbe: Sync {
    fn probe<'a>(&'a self, function: &'a str) -> ProbeFuture<'a>;
}
