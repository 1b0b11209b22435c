// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn state() -> RuntimeState {
    RuntimeState {
        id: "abc".into(),
        name: "app".into(),
        image: "vendor/app:1.8.0".into(),
        ports: vec![],
        mounts: vec![],
        env: vec!["FOO=bar".into(), "FOO=baz".into()],
        networks: vec![],
        restart_policy: RestartPolicy::default(),
    }
}

#[test]
fn empty_name_is_invalid() {
    let mut s = state();
    s.name.clear();
    assert_eq!(s.validate(), Err(RuntimeStateError::EmptyName));
}

#[test]
fn bind_mount_without_source_is_invalid() {
    let mut s = state();
    s.mounts.push(Mount {
        typ: MountType::Bind,
        source: "".into(),
        destination: "/data".into(),
        mode: "rw".into(),
        rw: true,
    });
    assert!(s.validate().is_err());
}

#[test]
fn env_value_returns_first_duplicate() {
    let s = state();
    assert_eq!(s.env_value("FOO"), Some("bar"));
}
