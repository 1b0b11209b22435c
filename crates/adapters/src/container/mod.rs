// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container Runtime Adapter (spec §4.C1): shells to the configured
//! container tool binary (`docker`, `podman`, ...), parses its JSON output,
//! and absorbs idempotent-failure phrasing from stop/remove/start.

mod real;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use real::RealContainerAdapter;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{ContainerCall, FakeContainerAdapter};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("container tool error: {0}")]
    ToolFailed(String),
    #[error("failed to parse container tool output: {0}")]
    ParseFailed(String),
}

/// A single entry from `List`, as returned by `container-tool ps --format json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerListEntry {
    pub name: String,
    pub image: String,
}

/// Shells out to the container tool: list, inspect, stop, remove, run, pull,
/// prune (spec §4.C1). Every method enforces an overall timeout via its
/// context; idempotent operations swallow "not found"/"not running" output.
#[async_trait]
pub trait ContainerRuntimeAdapter: Send + Sync + 'static {
    async fn pull(&self, image: &str) -> Result<(), ContainerError>;

    /// Succeeds (no error) when the container is already stopped.
    async fn stop(&self, name: &str) -> Result<(), ContainerError>;

    /// Succeeds (no error) when the container is already running.
    async fn start(&self, name: &str) -> Result<(), ContainerError>;

    async fn restart(&self, name: &str) -> Result<(), ContainerError>;

    /// Succeeds (no error) when the container is already gone.
    async fn remove(&self, name: &str) -> Result<(), ContainerError>;

    /// Runs `argv` (as built by `pud-topology::argv::build_upgrade_args`) via
    /// `container-tool run ...`. `argv` excludes the `container-tool` binary
    /// name itself.
    async fn run(&self, argv: &[String]) -> Result<(), ContainerError>;

    async fn inspect_running(&self, name: &str) -> Result<bool, ContainerError>;

    /// Removes images of `repo` other than `keep_tag` (spec §4.C10 Ready: "optionally prune old images").
    async fn prune_images(&self, repo: &str, keep_tag: &str) -> Result<(), ContainerError>;

    async fn list(&self, filter: Option<&str>) -> Result<Vec<ContainerListEntry>, ContainerError>;

    /// Raw `inspect` JSON document for a single container, for the discovery
    /// component (C5) to translate into `RuntimeState`.
    async fn inspect_json(&self, name: &str) -> Result<Value, ContainerError>;
}

/// Idempotence contract from spec §4.C1: these output substrings mean the
/// operation already achieved its goal and should be treated as success.
pub(crate) fn is_already_stopped_or_removed(output: &str) -> bool {
    output.contains("No such container")
        || output.contains("is not running")
        || output.contains("already stopped")
}

pub(crate) fn is_already_running(output: &str) -> bool {
    output.contains("is already running")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
