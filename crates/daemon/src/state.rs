// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared daemon state: everything an axum handler needs, behind `Arc` so it
//! can be cloned into each request's task cheaply (spec §5 HTTP worker model).

use std::sync::Arc;

use pud_adapters::{ContainerRuntimeAdapter, RealContainerAdapter};
use pud_core::SystemClock;
use pud_engine::ConcurrencyGate;
use pud_storage::{JobStore, JobStoreError};

use crate::config::Config;

pub struct AppState {
    pub config: Config,
    pub container: Arc<dyn ContainerRuntimeAdapter>,
    pub http_client: reqwest::Client,
    pub job_store: Arc<JobStore>,
    pub gate: Arc<ConcurrencyGate>,
    pub clock: SystemClock,
}

impl AppState {
    /// Seeds the concurrency gate from the last persisted job so a daemon
    /// restart with a job stuck mid-upgrade keeps `/upgrade/run` returning
    /// 409 instead of handing a fresh in-process mutex to the next request
    /// (spec §4.C10, scenario 7).
    pub fn new(config: Config, job_store: JobStore) -> Result<Self, JobStoreError> {
        let container = RealContainerAdapter::new(config.container_tool_binary.clone());
        let last_job = job_store.load_latest()?;
        let gate = ConcurrencyGate::seeded_from(last_job.as_ref());
        Ok(Self {
            http_client: reqwest::Client::new(),
            container: Arc::new(container),
            job_store: Arc::new(job_store),
            gate: Arc::new(gate),
            clock: SystemClock,
            config,
        })
    }
}

pub type SharedState = Arc<AppState>;
