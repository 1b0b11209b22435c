// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Additive-only reconciliation of ports, mounts, and env (spec §4.C6).
//!
//! Reconciliation never removes or rewrites anything already present on the
//! inspected container; it only adds entries the Manifest calls for that
//! aren't already covered.

use pud_core::manifest::{PortSpec, VolumeSpec};
use pud_core::{Mount, MountType, PortMapping};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("PORT_CONFLICT: host port {0} is already mapped to a different container port")]
    PortConflict(String),
}

/// Adds Manifest ports not already covered by the inspected set. A Manifest
/// port whose container port is already mapped is left untouched (the
/// inspected mapping wins). A Manifest port that asks for a host port already
/// claimed by a *different* container port is a conflict.
pub fn reconcile_ports(
    inspected: &[PortMapping],
    manifest_ports: &[PortSpec],
) -> Result<Vec<PortMapping>, ReconcileError> {
    let mut result = inspected.to_vec();

    for spec in manifest_ports {
        let protocol = spec.protocol.clone().unwrap_or_else(|| "tcp".to_string());
        let already_covered = result
            .iter()
            .any(|p| p.container_port == spec.container && p.protocol == protocol);
        if already_covered {
            continue;
        }

        let host_port = spec.host.clone().unwrap_or_else(|| spec.container.clone());
        if let Some(conflict) = result.iter().find(|p| {
            p.host_port == host_port && p.protocol == protocol && p.container_port != spec.container
        }) {
            return Err(ReconcileError::PortConflict(conflict.host_port.clone()));
        }

        result.push(PortMapping {
            host_ip: "0.0.0.0".to_string(),
            host_port,
            container_port: spec.container.clone(),
            protocol,
        });
    }

    Ok(result)
}

/// Adds Manifest volumes whose destination isn't already mounted. Existing
/// mounts are never displaced, deduplicating by destination.
pub fn reconcile_mounts(inspected: &[Mount], manifest_volumes: &[VolumeSpec]) -> Vec<Mount> {
    let mut result = inspected.to_vec();

    for spec in manifest_volumes {
        if result.iter().any(|m| m.destination == spec.destination) {
            continue;
        }
        let rw = !spec.readonly;
        let typ = if spec.source.is_empty() { MountType::Volume } else { MountType::Bind };
        result.push(Mount {
            typ,
            source: spec.source.clone(),
            destination: spec.destination.clone(),
            mode: if rw { "rw" } else { "ro" }.to_string(),
            rw,
        });
    }

    result
}

/// Adds Manifest env entries whose key isn't already set on the container.
/// Existing values are never overwritten.
pub fn reconcile_env(inspected: &[String], manifest_env: &[String]) -> Vec<String> {
    let mut result = inspected.to_vec();

    for entry in manifest_env {
        let Some((key, _)) = entry.split_once('=') else {
            continue;
        };
        let already_set = result.iter().any(|e| {
            e.split_once('=').map(|(k, _)| k) == Some(key)
        });
        if !already_set {
            result.push(entry.clone());
        }
    }

    result
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
