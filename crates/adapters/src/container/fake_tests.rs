// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn run_registers_container_by_name_flag() {
    let adapter = FakeContainerAdapter::default();
    adapter
        .run(&[
            "run".into(),
            "-d".into(),
            "--name".into(),
            "app".into(),
            "vendor/app:1.9.0".into(),
        ])
        .await
        .unwrap();
    assert!(adapter.is_running("app"));
}

#[tokio::test]
async fn fail_next_only_fails_once() {
    let adapter = FakeContainerAdapter::default();
    adapter.fail_next("pull", "boom");
    assert!(adapter.pull("vendor/app:1.9.0").await.is_err());
    assert!(adapter.pull("vendor/app:1.9.0").await.is_ok());
}
