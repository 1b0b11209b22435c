// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn ports_additive_skips_already_covered_container_port() {
    let inspected = vec![PortMapping {
        host_ip: "0.0.0.0".into(),
        host_port: "9443".into(),
        container_port: "443".into(),
        protocol: "tcp".into(),
    }];
    let manifest = vec![PortSpec {
        container: "443".into(),
        host: Some("1111".into()),
        protocol: None,
    }];
    let result = reconcile_ports(&inspected, &manifest).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].host_port, "9443");
}

#[test]
fn ports_additive_adds_new_container_port() {
    let inspected = vec![];
    let manifest = vec![PortSpec {
        container: "443".into(),
        host: Some("9443".into()),
        protocol: None,
    }];
    let result = reconcile_ports(&inspected, &manifest).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].host_port, "9443");
    assert_eq!(result[0].protocol, "tcp");
}

#[test]
fn ports_conflict_when_host_port_claimed_by_other_container_port() {
    let inspected = vec![PortMapping {
        host_ip: "0.0.0.0".into(),
        host_port: "9443".into(),
        container_port: "8443".into(),
        protocol: "tcp".into(),
    }];
    let manifest = vec![PortSpec {
        container: "443".into(),
        host: Some("9443".into()),
        protocol: None,
    }];
    assert_eq!(
        reconcile_ports(&inspected, &manifest),
        Err(ReconcileError::PortConflict("9443".into()))
    );
}

#[test]
fn mounts_dedupe_by_destination() {
    let inspected = vec![Mount {
        typ: MountType::Volume,
        source: "data-vol".into(),
        destination: "/data".into(),
        mode: "rw".into(),
        rw: true,
    }];
    let manifest = vec![VolumeSpec {
        source: "other-vol".into(),
        destination: "/data".into(),
        readonly: false,
    }];
    let result = reconcile_mounts(&inspected, &manifest);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].source, "data-vol");
}

#[test]
fn mounts_with_nonempty_source_are_bind_mounts() {
    let result = reconcile_mounts(
        &[],
        &[VolumeSpec {
            source: "/host/data".into(),
            destination: "/data".into(),
            readonly: false,
        }],
    );
    assert_eq!(result[0].typ, MountType::Bind);
}

#[test]
fn mounts_with_empty_source_are_named_volumes() {
    let result = reconcile_mounts(
        &[],
        &[VolumeSpec {
            source: String::new(),
            destination: "/data".into(),
            readonly: false,
        }],
    );
    assert_eq!(result[0].typ, MountType::Volume);
}

#[test]
fn env_never_overwrites_existing_key() {
    let inspected = vec!["FOO=original".to_string()];
    let manifest = vec!["FOO=new".to_string(), "BAR=added".to_string()];
    let result = reconcile_env(&inspected, &manifest);
    assert_eq!(result, vec!["FOO=original".to_string(), "BAR=added".to_string()]);
}
