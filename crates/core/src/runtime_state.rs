// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime state extracted from a live container (spec §3).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    pub host_ip: String,
    pub host_port: String,
    pub container_port: String,
    pub protocol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountType {
    Volume,
    Bind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    #[serde(rename = "type")]
    pub typ: MountType,
    pub source: String,
    pub destination: String,
    /// "" | "ro" | "rw"
    pub mode: String,
    pub rw: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network_name: String,
    pub ip_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RestartPolicy {
    pub name: String,
    pub maximum_retry_count: i64,
}

/// Full topology of a running container, as extracted by discovery (C5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeState {
    pub id: String,
    pub name: String,
    /// `repo:tag`
    pub image: String,
    pub ports: Vec<PortMapping>,
    pub mounts: Vec<Mount>,
    /// `"KEY=VALUE"` entries, duplicates preserved verbatim.
    pub env: Vec<String>,
    pub networks: Vec<NetworkConfig>,
    pub restart_policy: RestartPolicy,
}

/// Errors that make a `RuntimeState` unusable downstream (spec §3 invariants).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RuntimeStateError {
    #[error("container name is empty")]
    EmptyName,
    #[error("mount has empty destination: {0:?}")]
    EmptyMountDestination(Mount),
    #[error("bind mount requires a source: {0:?}")]
    BindMountMissingSource(Mount),
}

impl RuntimeState {
    /// Validate the invariants from spec §3: non-empty name; no mount with an
    /// empty destination; bind mounts require a non-empty source.
    pub fn validate(&self) -> Result<(), RuntimeStateError> {
        if self.name.is_empty() {
            return Err(RuntimeStateError::EmptyName);
        }
        for mount in &self.mounts {
            if mount.destination.is_empty() {
                return Err(RuntimeStateError::EmptyMountDestination(mount.clone()));
            }
            if mount.typ == MountType::Bind && mount.source.is_empty() {
                return Err(RuntimeStateError::BindMountMissingSource(mount.clone()));
            }
        }
        Ok(())
    }

    /// Looks up an env entry by key, returning the first match (duplicates
    /// preserved but the first wins for lookups, matching shell `export` semantics).
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env.iter().find_map(|entry| {
            let (k, v) = entry.split_once('=')?;
            (k == key).then_some(v)
        })
    }
}

#[cfg(test)]
#[path = "runtime_state_tests.rs"]
mod tests;
