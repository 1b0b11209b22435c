// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest document (spec §3): a strictly additive overlay fetched by C3.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    pub container: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSpec {
    #[serde(default)]
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ManifestDefaults {
    #[serde(default)]
    pub container_name: String,
    #[serde(default)]
    pub restart_policy: String,
    #[serde(default)]
    pub ports: Vec<PortSpec>,
    #[serde(default)]
    pub volumes: Vec<VolumeSpec>,
    /// `"KEY=VALUE"` entries reconciled additively against the inspected
    /// container's environment (spec §4.C6).
    #[serde(default)]
    pub env: Vec<String>,
}

/// A per-version override; present fields replace the matching
/// `ManifestDefaults` field wholesale (field-by-field replace, not merge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VersionOverride {
    pub version: String,
    #[serde(default)]
    pub container_name: Option<String>,
    #[serde(default)]
    pub restart_policy: Option<String>,
    #[serde(default)]
    pub ports: Option<Vec<PortSpec>>,
    #[serde(default)]
    pub volumes: Option<Vec<VolumeSpec>>,
    #[serde(default)]
    pub env: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestImage {
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub image: ManifestImage,
    pub defaults: ManifestDefaults,
    #[serde(default)]
    pub overrides: Vec<VersionOverride>,
}

impl Manifest {
    /// Apply the per-version override matching `resolved_target`, if any,
    /// field-by-field replacing the corresponding default (spec §4.C10
    /// ManifestFetching). Returns the effective defaults to reconcile against.
    pub fn effective_defaults(&self, resolved_target: &str) -> ManifestDefaults {
        let mut defaults = self.defaults.clone();
        if let Some(over) = self.overrides.iter().find(|o| o.version == resolved_target) {
            if let Some(name) = &over.container_name {
                defaults.container_name = name.clone();
            }
            if let Some(policy) = &over.restart_policy {
                defaults.restart_policy = policy.clone();
            }
            if let Some(ports) = &over.ports {
                defaults.ports = ports.clone();
            }
            if let Some(volumes) = &over.volumes {
                defaults.volumes = volumes.clone();
            }
            if let Some(env) = &over.env {
                defaults.env = env.clone();
            }
        }
        defaults
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
