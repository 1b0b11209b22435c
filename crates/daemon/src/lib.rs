// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Payram Updater Daemon (`pudd`): axum-served loopback control plane over
//! the upgrade engine (spec §6).

pub mod config;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{Config, ConfigError};
pub use router::router;
pub use state::{AppState, SharedState};
