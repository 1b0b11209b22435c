// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and state machine (spec §3/§4.C10).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for an upgrade job.
    pub struct JobId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Dashboard,
    Manual,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Dashboard => write!(f, "dashboard"),
            Mode::Manual => write!(f, "manual"),
        }
    }
}

/// States of the upgrade state machine (spec §4.C10). `Ready` and `Failed`
/// are terminal; `Failed` is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    PolicyFetching,
    ManifestFetching,
    BackingUp,
    Executing,
    Verifying,
    Ready,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Ready | JobState::Failed)
    }

    /// Whether this state represents an active (non-terminal) job, i.e. one
    /// that blocks a new `/upgrade/run` under the concurrency gate (spec §4.C10).
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::PolicyFetching => "policy_fetching",
            JobState::ManifestFetching => "manifest_fetching",
            JobState::BackingUp => "backing_up",
            JobState::Executing => "executing",
            JobState::Verifying => "verifying",
            JobState::Ready => "ready",
            JobState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Error returned when an attempted transition would violate monotonicity
/// (spec §8 P1: a job never transitions from a terminal state).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("cannot transition job from terminal state {from} to {to}")]
pub struct TerminalTransitionError {
    pub from: JobState,
    pub to: JobState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub mode: Mode,
    pub requested_target: String,
    #[serde(default)]
    pub resolved_target: String,
    pub state: JobState,
    #[serde(default)]
    pub failure_code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub backup_path: Option<String>,
    pub image_repo: String,
    pub container_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        id: JobId,
        mode: Mode,
        requested_target: String,
        image_repo: String,
        container_name: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            mode,
            requested_target,
            resolved_target: String::new(),
            state: JobState::Pending,
            failure_code: String::new(),
            message: String::new(),
            backup_path: None,
            image_repo,
            container_name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `state`, refusing to leave a terminal state (spec §8 P1).
    /// Callers own persistence; this only enforces the invariant and stamps
    /// `updated_at`.
    pub fn transition(
        &mut self,
        state: JobState,
        now: DateTime<Utc>,
    ) -> Result<(), TerminalTransitionError> {
        if self.state.is_terminal() {
            return Err(TerminalTransitionError {
                from: self.state,
                to: state,
            });
        }
        self.state = state;
        self.updated_at = now;
        Ok(())
    }

    pub fn fail(&mut self, code: crate::FailureCode, message: impl Into<String>, now: DateTime<Utc>) {
        // Failure is always reachable from a non-terminal state; once
        // terminal, a job is done and `fail` is a no-op on the state itself
        // beyond the already-enforced terminal guard in `transition`.
        if self.transition(JobState::Failed, now).is_ok() {
            self.failure_code = code.as_str().to_string();
            self.message = message.into();
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
