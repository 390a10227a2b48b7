// src/engine/convergence.rs

//! Pure readiness-convergence state machine.
//!
//! The core keeps the last observed readiness of every monitored unit and
//! decides, probe by probe, what to look at next. It performs no IO and has
//! no notion of time; the async shell in [`super::poller`] sleeps, probes and
//! feeds results back in.
//!
//! Within a tick, units are scanned in construction order and the scan stops
//! at the first unit that is not ready. Convergence means every unit's last
//! observed status is ready.

use super::Readiness;

/// What the shell should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStep {
    /// Probe the unit at this index.
    Probe(usize),
    /// Nothing more to probe this tick.
    EndOfTick,
}

#[derive(Debug, Clone)]
pub struct Convergence {
    statuses: Vec<bool>,
    ticks: u64,
}

impl Convergence {
    pub fn new(units: usize) -> Self {
        Self {
            statuses: vec![false; units],
            ticks: 0,
        }
    }

    /// True once every unit has last been observed ready.
    ///
    /// Trivially true for zero units.
    pub fn is_converged(&self) -> bool {
        self.statuses.iter().all(|ready| *ready)
    }

    /// Begin a new tick and return the first step of its scan.
    pub fn start_tick(&mut self) -> ScanStep {
        self.ticks += 1;
        if self.statuses.is_empty() {
            ScanStep::EndOfTick
        } else {
            ScanStep::Probe(0)
        }
    }

    /// Record the probe result for `unit` and return the next step.
    pub fn record(&mut self, unit: usize, readiness: Readiness) -> ScanStep {
        let ready = readiness.is_ready();
        self.statuses[unit] = ready;

        if !ready {
            return ScanStep::EndOfTick;
        }

        if unit + 1 < self.statuses.len() {
            ScanStep::Probe(unit + 1)
        } else {
            ScanStep::EndOfTick
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn statuses(&self) -> &[bool] {
        &self.statuses
    }
}
