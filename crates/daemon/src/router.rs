// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Axum router for the loopback HTTP control plane (spec §6). Enriched from
//! the `periphery` binary's approach to a single-node, loopback-reachable
//! control surface over a container runtime.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::SharedState;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/upgrade/plan", post(handlers::plan))
        .route("/upgrade/run", post(handlers::run))
        .route("/upgrade/status", get(handlers::status))
        .route("/upgrade/logs", get(handlers::logs))
        .route("/inspect", get(handlers::inspect))
        .route("/recover", post(handlers::recover))
        .route("/sync", post(handlers::sync))
        .route("/backup/create", post(handlers::backup_create))
        .route("/backup/list", get(handlers::backup_list))
        .route("/backup/restore", post(handlers::backup_restore))
        .with_state(state)
}
