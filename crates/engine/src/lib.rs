// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Upgrade Engine, Automated Recoverer, and Inspector (spec §4.C10-C12):
//! the orchestration layer that drives a `Job` through its state machine and
//! runs the daemon's startup-recovery and on-demand diagnostic sweeps.

pub mod gate;
pub mod inspector;
pub mod recoverer;
pub mod upgrade;

pub use gate::{ConcurrencyGate, GateHandle};
pub use inspector::{inspect, CheckResult, InspectionReport, InspectorConfig, OverallState};
pub use recoverer::{
    apply_recovery, classify_last_job, full_recovery, poll_target_health, FullRecoveryConfig,
    FullRecoveryError, RecoverOutcome, RecoveryAction,
};
pub use upgrade::{plan_upgrade, run_upgrade, PlanResult, PlanState, UpgradeConfig, UpgradeDeps, UpgradeError};
