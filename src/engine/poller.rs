// src/engine/poller.rs

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::PollingSettings;
use crate::errors::{Result, StackError};

use super::convergence::{Convergence, ScanStep};
use super::ReadinessProbe;

/// Fixed-interval convergence loop around [`Convergence`].
///
/// Every tick sleeps for `interval` and then scans the units. A probe error
/// aborts the wait immediately. Without a `timeout` the loop waits for as
/// long as it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPoller {
    interval: Duration,
    timeout: Option<Duration>,
}

impl ReadinessPoller {
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Self {
        Self { interval, timeout }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Wait until every unit in `units` reports ready.
    ///
    /// Units are probed in slice order. Returns the number of ticks it took.
    pub async fn wait_until_ready<P>(&self, stack: &str, probe: &P, units: &[String]) -> Result<u64>
    where
        P: ReadinessProbe + ?Sized,
    {
        let started = Instant::now();
        let mut state = Convergence::new(units.len());

        while !state.is_converged() {
            if let Some(timeout) = self.timeout {
                let waited = started.elapsed();
                if waited >= timeout {
                    return Err(StackError::ReadinessTimeout {
                        stack: stack.to_string(),
                        waited,
                    });
                }
            }

            tokio::time::sleep(self.interval).await;

            let mut step = state.start_tick();
            while let ScanStep::Probe(index) = step {
                let unit = &units[index];
                let readiness = probe.probe(unit).await.map_err(|source| StackError::Probe {
                    function: unit.clone(),
                    source,
                })?;

                debug!(
                    stack,
                    function = %unit,
                    tick = state.ticks(),
                    ?readiness,
                    "readiness probe"
                );
                step = state.record(index, readiness);
            }
        }

        info!(
            stack,
            functions = units.len(),
            ticks = state.ticks(),
            "all functions ready"
        );
        Ok(state.ticks())
    }
}

impl From<PollingSettings> for ReadinessPoller {
    fn from(settings: PollingSettings) -> Self {
        Self::new(settings.interval, settings.timeout)
    }
}
