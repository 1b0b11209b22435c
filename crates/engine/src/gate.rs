// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight concurrency gate (spec §5/§4.C10): at most one upgrade job
//! may be active at a time; a second `/upgrade/run` while one is in flight is
//! rejected with `CONCURRENCY_BLOCKED` rather than queued.

use parking_lot::Mutex;
use pud_core::{Job, JobId};

#[derive(Default)]
pub struct ConcurrencyGate {
    active: Mutex<Option<JobId>>,
}

/// RAII handle: dropping it releases the gate, so a panicking or
/// early-returning upgrade task can't wedge the daemon.
pub struct GateHandle<'a> {
    gate: &'a ConcurrencyGate,
}

impl Drop for GateHandle<'_> {
    fn drop(&mut self) {
        *self.gate.active.lock() = None;
    }
}

impl ConcurrencyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the gate from the last persisted job (spec §4.C10): the
    /// in-process mutex alone resets empty on every restart, so a job left
    /// stuck in a non-terminal state by a prior crash must keep blocking new
    /// runs until `recover` or manual intervention clears it, not silently
    /// grant the gate to the next `/upgrade/run` right after the daemon
    /// comes back up.
    pub fn seeded_from(last_job: Option<&Job>) -> Self {
        let active = last_job
            .filter(|job| !job.state.is_terminal())
            .map(|job| job.id.clone());
        Self {
            active: Mutex::new(active),
        }
    }

    /// Attempts to claim the gate for `job_id`. Returns the id of the job
    /// already running if the gate is held.
    pub fn try_acquire(&self, job_id: JobId) -> Result<GateHandle<'_>, JobId> {
        let mut active = self.active.lock();
        if let Some(current) = active.as_ref() {
            return Err(current.clone());
        }
        *active = Some(job_id);
        Ok(GateHandle { gate: self })
    }

    pub fn active_job(&self) -> Option<JobId> {
        self.active.lock().clone()
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
