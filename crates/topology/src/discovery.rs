// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service discovery and port identification (spec §4.C5).

use pud_adapters::ContainerRuntimeAdapter;
use pud_core::{Mount, MountType, NetworkConfig, PortMapping, RestartPolicy, RuntimeState};
use semver::Version;
use serde_json::Value;
use thiserror::Error;
use std::time::Duration;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("PAYRAM_CONTAINER_NOT_FOUND")]
    ContainerNotFound,
    #[error("PAYRAM_CORE_PORT_NOT_FOUND")]
    CorePortNotFound,
    #[error("CONTAINER_NAME_UNRESOLVED")]
    ContainerNameUnresolved,
    #[error("CONTAINER_NOT_FOUND: {0}")]
    ContainerValidationFailed(String),
    #[error("failed to inspect container: {0}")]
    InspectFailed(String),
}

/// Strip a leading `v`/`V` and parse the remainder as semver. Returns `None`
/// for anything that doesn't parse, so callers can drop the entry (spec §4.C5 step 3).
fn parse_tag_as_semver(tag: &str) -> Option<Version> {
    let stripped = tag.strip_prefix('v').or_else(|| tag.strip_prefix('V')).unwrap_or(tag);
    Version::parse(stripped).ok()
}

/// Locate the Target container by image-repository prefix, selecting the
/// highest semver tag (spec §4.C5, P9).
pub async fn discover_target_container(
    adapter: &dyn ContainerRuntimeAdapter,
    image_prefix: &str,
) -> Result<String, DiscoveryError> {
    let entries = adapter
        .list(None)
        .await
        .map_err(|e| DiscoveryError::InspectFailed(e.to_string()))?;

    let mut best: Option<(Version, String)> = None;
    for entry in entries {
        if !entry.image.starts_with(image_prefix) {
            continue;
        }
        let Some((_, tag)) = entry.image.split_once(image_prefix) else {
            continue;
        };
        let tag = tag.trim_start_matches(':');
        if tag == "latest" {
            continue;
        }
        let Some(version) = parse_tag_as_semver(tag) else {
            continue;
        };
        let better = match &best {
            Some((current, _)) => version > *current,
            None => true,
        };
        if better {
            best = Some((version, entry.name));
        }
    }
    best.map(|(_, name)| name).ok_or(DiscoveryError::ContainerNotFound)
}

fn json_str(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Translate raw `inspect` JSON into a `RuntimeState` (spec §3/§4.C5).
/// Container names with a leading `/` are normalised by stripping the slash.
pub fn runtime_state_from_inspect(inspect: &Value) -> RuntimeState {
    let id = json_str(inspect, "/Id");
    let name = json_str(inspect, "/Name").trim_start_matches('/').to_string();
    let image = inspect
        .pointer("/Config/Image")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let env: Vec<String> = inspect
        .pointer("/Config/Env")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let ports: Vec<PortMapping> = inspect
        .pointer("/NetworkSettings/Ports")
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .flat_map(|(key, bindings)| {
                    let (container_port, protocol) = key.split_once('/').unwrap_or((key, "tcp"));
                    let bindings = bindings.as_array().cloned().unwrap_or_default();
                    bindings.into_iter().filter_map(move |binding| {
                        let host_ip = binding.get("HostIp")?.as_str()?.to_string();
                        let host_port = binding.get("HostPort")?.as_str()?.to_string();
                        Some(PortMapping {
                            host_ip,
                            host_port,
                            container_port: container_port.to_string(),
                            protocol: protocol.to_string(),
                        })
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let mounts: Vec<Mount> = inspect
        .pointer("/Mounts")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .map(|m| {
                    let source = m.get("Source").and_then(Value::as_str).unwrap_or_default().to_string();
                    let destination = m
                        .get("Destination")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    let rw = m.get("RW").and_then(Value::as_bool).unwrap_or(true);
                    let typ_str = m.get("Type").and_then(Value::as_str).unwrap_or("volume");
                    let typ = if typ_str == "bind" {
                        MountType::Bind
                    } else {
                        MountType::Volume
                    };
                    let mode = if rw { "rw" } else { "ro" }.to_string();
                    Mount {
                        typ,
                        source,
                        destination,
                        mode,
                        rw,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let networks: Vec<NetworkConfig> = inspect
        .pointer("/NetworkSettings/Networks")
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .map(|(name, cfg)| NetworkConfig {
                    network_name: name.clone(),
                    ip_address: cfg.get("IPAddress").and_then(Value::as_str).unwrap_or_default().to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let restart_policy = RestartPolicy {
        name: json_str(inspect, "/HostConfig/RestartPolicy/Name"),
        maximum_retry_count: inspect
            .pointer("/HostConfig/RestartPolicy/MaximumRetryCount")
            .and_then(Value::as_i64)
            .unwrap_or(0),
    };

    RuntimeState {
        id,
        name,
        image,
        ports,
        mounts,
        env,
        networks,
        restart_policy,
    }
}

/// Inspect `name` and translate into `RuntimeState` (spec §4.C5).
pub async fn extract_runtime_state(
    adapter: &dyn ContainerRuntimeAdapter,
    name: &str,
) -> Result<RuntimeState, DiscoveryError> {
    let raw = adapter
        .inspect_json(name)
        .await
        .map_err(|e| DiscoveryError::InspectFailed(e.to_string()))?;
    Ok(runtime_state_from_inspect(&raw))
}

const WELCOME_TOKEN: &str = "payram";
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
const PROBE_BODY_CAP: usize = 10 * 1024;

/// Probe each TCP host port for the fixed welcome token, returning the first
/// match (spec §4.C5). Redirects are not followed: a port whose root merely
/// redirects elsewhere must be treated as non-matching, not transparently
/// chased to whatever it points at -- so this builds its own client rather
/// than trusting the caller's, since every other HTTP use in this workspace
/// wants reqwest's default follow-redirects behavior.
pub async fn identify_core_port(runtime_state: &RuntimeState) -> Result<String, DiscoveryError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| DiscoveryError::InspectFailed(e.to_string()))?;
    for mapping in &runtime_state.ports {
        if mapping.protocol != "tcp" || mapping.host_port.is_empty() {
            continue;
        }
        let url = format!("http://localhost:{}/", mapping.host_port);
        let Ok(response) = client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        else {
            continue;
        };
        let Ok(bytes) = response.bytes().await else {
            continue;
        };
        let capped = &bytes[..bytes.len().min(PROBE_BODY_CAP)];
        let body = String::from_utf8_lossy(capped);
        if body.contains(WELCOME_TOKEN) {
            return Ok(mapping.host_port.clone());
        }
    }
    Err(DiscoveryError::CorePortNotFound)
}

/// Resolve the Target container name (spec §4.C5): env override, then
/// manifest default, then `CONTAINER_NAME_UNRESOLVED`.
pub fn resolve_container_name(
    env_override: Option<&str>,
    manifest_default: &str,
) -> Result<String, DiscoveryError> {
    if let Some(name) = env_override {
        if !name.is_empty() {
            return Ok(name.to_string());
        }
    }
    if !manifest_default.is_empty() {
        return Ok(manifest_default.to_string());
    }
    Err(DiscoveryError::ContainerNameUnresolved)
}

/// Validate that `name` actually exists, translating the container tool's
/// "no such container" phrasing to `CONTAINER_NOT_FOUND` (spec §4.C5).
pub async fn validate_exists(
    adapter: &dyn ContainerRuntimeAdapter,
    name: &str,
) -> Result<(), DiscoveryError> {
    match adapter.inspect_json(name).await {
        Ok(_) => Ok(()),
        Err(e) => Err(DiscoveryError::ContainerValidationFailed(e.to_string())),
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
