// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Discovery, identification, and reconciliation (spec §4.C5-C6): locating
//! the Target container, extracting its `RuntimeState`, identifying the core
//! HTTP port, and building the additive-only `run` argv for an upgrade.

pub mod argv;
pub mod discovery;
pub mod reconcile;

pub use argv::build_upgrade_args;
pub use discovery::{
    discover_target_container, extract_runtime_state, identify_core_port, resolve_container_name,
    runtime_state_from_inspect, validate_exists, DiscoveryError,
};
pub use reconcile::{reconcile_env, reconcile_mounts, reconcile_ports, ReconcileError};
