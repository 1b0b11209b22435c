// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pud_core::MountType;

#[test]
fn formats_on_failure_with_retry_count() {
    let policy = RestartPolicy {
        name: "on-failure".into(),
        maximum_retry_count: 5,
    };
    assert_eq!(format_restart_policy(&policy), "on-failure:5");
}

#[test]
fn formats_always_without_retry_count() {
    let policy = RestartPolicy {
        name: "always".into(),
        maximum_retry_count: 0,
    };
    assert_eq!(format_restart_policy(&policy), "always");
}

#[test]
fn empty_policy_name_formats_as_no() {
    let policy = RestartPolicy {
        name: "".into(),
        maximum_retry_count: 0,
    };
    assert_eq!(format_restart_policy(&policy), "no");
}

#[test]
fn builds_full_argv_in_fixed_order() {
    let ports = vec![PortMapping {
        host_ip: "0.0.0.0".into(),
        host_port: "9443".into(),
        container_port: "443".into(),
        protocol: "tcp".into(),
    }];
    let mounts = vec![Mount {
        typ: MountType::Volume,
        source: "data-vol".into(),
        destination: "/data".into(),
        mode: "rw".into(),
        rw: true,
    }];
    let env = vec!["FOO=bar".to_string()];
    let networks = vec![NetworkConfig {
        network_name: "app-net".into(),
        ip_address: "172.18.0.2".into(),
    }];
    let restart_policy = RestartPolicy {
        name: "on-failure".into(),
        maximum_retry_count: 3,
    };

    let args = build_upgrade_args(
        "app",
        &restart_policy,
        &ports,
        &mounts,
        &env,
        &networks,
        "vendor/app:1.9.0",
    );

    assert_eq!(
        args,
        vec![
            "run", "-d", "--name", "app", "--restart", "on-failure:3", "-p", "9443:443", "-v",
            "data-vol:/data:rw", "-e", "FOO=bar", "--network", "app-net", "vendor/app:1.9.0",
        ]
    );
}

#[test]
fn default_bridge_network_is_not_emitted() {
    let networks = vec![NetworkConfig {
        network_name: "bridge".into(),
        ip_address: "172.17.0.2".into(),
    }];
    let restart_policy = RestartPolicy::default();
    let args = build_upgrade_args("app", &restart_policy, &[], &[], &[], &networks, "vendor/app:1.9.0");
    assert!(!args.contains(&"--network".to_string()));
}

#[test]
fn volume_with_empty_source_omits_leading_colon() {
    let mounts = vec![Mount {
        typ: MountType::Volume,
        source: String::new(),
        destination: "/data".into(),
        mode: "rw".into(),
        rw: true,
    }];
    let restart_policy = RestartPolicy::default();
    let args = build_upgrade_args("app", &restart_policy, &[], &mounts, &[], &[], "vendor/app:1.9.0");
    let idx = args.iter().position(|a| a == "-v").unwrap();
    assert_eq!(args[idx + 1], "/data:rw");
    assert!(!args[idx + 1].starts_with(':'));
}

#[test]
fn non_tcp_port_gets_protocol_suffix() {
    let ports = vec![PortMapping {
        host_ip: "0.0.0.0".into(),
        host_port: "53".into(),
        container_port: "53".into(),
        protocol: "udp".into(),
    }];
    let restart_policy = RestartPolicy::default();
    let args = build_upgrade_args("app", &restart_policy, &ports, &[], &[], &[], "vendor/app:1.9.0");
    let idx = args.iter().position(|a| a == "-p").unwrap();
    assert_eq!(args[idx + 1], "53:53/udp");
}
