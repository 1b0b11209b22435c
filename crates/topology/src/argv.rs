// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the `container-tool run` argv from a reconciled `RuntimeState`
//! (spec §4.C6). Ordering is fixed so the resulting argv is deterministic and
//! reviewable: name, restart policy, ports, mounts, env, network, image.

use pud_core::{Mount, NetworkConfig, PortMapping, RestartPolicy};

/// Formats a restart policy the way the container tool's `--restart` flag
/// expects: `name:max-retries` when the count is set and the policy supports
/// it, otherwise the bare policy name.
fn format_restart_policy(policy: &RestartPolicy) -> String {
    if policy.name == "on-failure" && policy.maximum_retry_count > 0 {
        format!("{}:{}", policy.name, policy.maximum_retry_count)
    } else if policy.name.is_empty() {
        "no".to_string()
    } else {
        policy.name.clone()
    }
}

fn format_port_mapping(mapping: &PortMapping) -> String {
    let suffix = if mapping.protocol == "tcp" {
        String::new()
    } else {
        format!("/{}", mapping.protocol)
    };
    if mapping.host_ip.is_empty() || mapping.host_ip == "0.0.0.0" {
        format!("{}:{}{suffix}", mapping.host_port, mapping.container_port)
    } else {
        format!(
            "{}:{}:{}{suffix}",
            mapping.host_ip, mapping.host_port, mapping.container_port
        )
    }
}

fn format_mount(mount: &Mount) -> String {
    if mount.source.is_empty() {
        format!("{}:{}", mount.destination, mount.mode)
    } else {
        format!("{}:{}:{}", mount.source, mount.destination, mount.mode)
    }
}

/// Builds the full `run` argv (excluding the container tool binary name and
/// the `run` subcommand, already supplied by the caller) for launching the
/// new version's container with the reconciled topology.
///
/// - `name`: resolved container name (spec §4.C5 `ResolveContainerName`).
/// - `ports`/`mounts`/`env`/`networks`: already reconciled (spec §4.C6).
/// - Only the first non-default network is attached; the container tool
///   attaches the default bridge network implicitly otherwise.
/// - `image_ref` is the full `repo:tag` for the new version.
pub fn build_upgrade_args(
    name: &str,
    restart_policy: &RestartPolicy,
    ports: &[PortMapping],
    mounts: &[Mount],
    env: &[String],
    networks: &[NetworkConfig],
    image_ref: &str,
) -> Vec<String> {
    let mut args = vec!["run".to_string(), "-d".to_string(), "--name".to_string(), name.to_string()];

    args.push("--restart".to_string());
    args.push(format_restart_policy(restart_policy));

    for mapping in ports {
        args.push("-p".to_string());
        args.push(format_port_mapping(mapping));
    }

    for mount in mounts {
        args.push("-v".to_string());
        args.push(format_mount(mount));
    }

    for entry in env {
        args.push("-e".to_string());
        args.push(entry.clone());
    }

    if let Some(network) = networks.iter().find(|n| n.network_name != "bridge" && n.network_name != "default") {
        args.push("--network".to_string());
        args.push(network.network_name.clone());
    }

    args.push(image_ref.to_string());
    args
}

#[cfg(test)]
#[path = "argv_tests.rs"]
mod tests;
