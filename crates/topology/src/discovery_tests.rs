// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pud_adapters::{ContainerListEntry, ContainerRuntimeAdapter};

struct ListOnlyAdapter(Vec<ContainerListEntry>);

#[async_trait::async_trait]
impl ContainerRuntimeAdapter for ListOnlyAdapter {
    async fn pull(&self, _: &str) -> Result<(), pud_adapters::ContainerError> {
        Ok(())
    }
    async fn stop(&self, _: &str) -> Result<(), pud_adapters::ContainerError> {
        Ok(())
    }
    async fn start(&self, _: &str) -> Result<(), pud_adapters::ContainerError> {
        Ok(())
    }
    async fn restart(&self, _: &str) -> Result<(), pud_adapters::ContainerError> {
        Ok(())
    }
    async fn remove(&self, _: &str) -> Result<(), pud_adapters::ContainerError> {
        Ok(())
    }
    async fn run(&self, _: &[String]) -> Result<(), pud_adapters::ContainerError> {
        Ok(())
    }
    async fn inspect_running(&self, _: &str) -> Result<bool, pud_adapters::ContainerError> {
        Ok(true)
    }
    async fn prune_images(&self, _: &str, _: &str) -> Result<(), pud_adapters::ContainerError> {
        Ok(())
    }
    async fn list(
        &self,
        _: Option<&str>,
    ) -> Result<Vec<ContainerListEntry>, pud_adapters::ContainerError> {
        Ok(self.0.clone())
    }
    async fn inspect_json(&self, _: &str) -> Result<Value, pud_adapters::ContainerError> {
        Ok(Value::Null)
    }
}

#[tokio::test]
async fn discover_picks_highest_semver_ignoring_latest() {
    let adapter = ListOnlyAdapter(vec![
        ContainerListEntry {
            name: "app-old".into(),
            image: "vendor/app:1.7.0".into(),
        },
        ContainerListEntry {
            name: "app-latest-alias".into(),
            image: "vendor/app:latest".into(),
        },
        ContainerListEntry {
            name: "app".into(),
            image: "vendor/app:v1.9.0".into(),
        },
        ContainerListEntry {
            name: "unrelated".into(),
            image: "other/thing:2.0.0".into(),
        },
    ]);
    let name = discover_target_container(&adapter, "vendor/app:").await.unwrap();
    assert_eq!(name, "app");
}

#[tokio::test]
async fn discover_fails_when_nothing_matches() {
    let adapter = ListOnlyAdapter(vec![]);
    let err = discover_target_container(&adapter, "vendor/app:").await.unwrap_err();
    assert_eq!(err, DiscoveryError::ContainerNotFound);
}

#[test]
fn strips_leading_v_before_parsing_semver() {
    assert!(parse_tag_as_semver("v1.2.3").is_some());
    assert!(parse_tag_as_semver("1.2.3").is_some());
    assert!(parse_tag_as_semver("not-a-version").is_none());
}

#[test]
fn resolve_container_name_precedence() {
    assert_eq!(
        resolve_container_name(Some("override"), "default").unwrap(),
        "override"
    );
    assert_eq!(resolve_container_name(None, "default").unwrap(), "default");
    assert_eq!(resolve_container_name(Some(""), "default").unwrap(), "default");
    assert!(resolve_container_name(None, "").is_err());
}

#[test]
fn runtime_state_strips_leading_slash_from_name() {
    let inspect = serde_json::json!({
        "Id": "abc123",
        "Name": "/app",
        "Config": {"Image": "vendor/app:1.8.0", "Env": ["FOO=bar"]},
        "Mounts": [],
        "NetworkSettings": {"Ports": {}, "Networks": {}},
        "HostConfig": {"RestartPolicy": {"Name": "on-failure", "MaximumRetryCount": 3}}
    });
    let state = runtime_state_from_inspect(&inspect);
    assert_eq!(state.name, "app");
    assert_eq!(state.restart_policy.name, "on-failure");
    assert_eq!(state.restart_policy.maximum_retry_count, 3);
}
