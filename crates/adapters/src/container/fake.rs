// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake container runtime adapter for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::{ContainerError, ContainerListEntry, ContainerRuntimeAdapter};

/// Recorded container tool call.
#[derive(Debug, Clone)]
pub enum ContainerCall {
    Pull(String),
    Stop(String),
    Start(String),
    Restart(String),
    Remove(String),
    Run(Vec<String>),
    InspectRunning(String),
    PruneImages { repo: String, keep_tag: String },
    List(Option<String>),
    InspectJson(String),
}

struct FakeState {
    containers: HashMap<String, FakeContainer>,
    calls: Vec<ContainerCall>,
    fail_next: HashMap<&'static str, String>,
}

#[derive(Clone)]
struct FakeContainer {
    image: String,
    running: bool,
    inspect: Value,
}

/// In-memory stand-in for the container tool. Tests register containers via
/// `with_container` and assert on `calls()`.
#[derive(Clone)]
pub struct FakeContainerAdapter {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeContainerAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                containers: HashMap::new(),
                calls: Vec::new(),
                fail_next: HashMap::new(),
            })),
        }
    }
}

impl FakeContainerAdapter {
    pub fn with_container(&self, name: &str, image: &str, inspect: Value) {
        self.inner.lock().containers.insert(
            name.to_string(),
            FakeContainer {
                image: image.to_string(),
                running: true,
                inspect,
            },
        );
    }

    pub fn fail_next(&self, op: &'static str, message: impl Into<String>) {
        self.inner.lock().fail_next.insert(op, message.into());
    }

    pub fn calls(&self) -> Vec<ContainerCall> {
        self.inner.lock().calls.clone()
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.inner
            .lock()
            .containers
            .get(name)
            .map(|c| c.running)
            .unwrap_or(false)
    }

    fn maybe_fail(&self, op: &'static str) -> Result<(), ContainerError> {
        if let Some(message) = self.inner.lock().fail_next.remove(op) {
            return Err(ContainerError::ToolFailed(message));
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerRuntimeAdapter for FakeContainerAdapter {
    async fn pull(&self, image: &str) -> Result<(), ContainerError> {
        self.inner.lock().calls.push(ContainerCall::Pull(image.to_string()));
        self.maybe_fail("pull")
    }

    async fn stop(&self, name: &str) -> Result<(), ContainerError> {
        self.inner.lock().calls.push(ContainerCall::Stop(name.to_string()));
        self.maybe_fail("stop")?;
        if let Some(c) = self.inner.lock().containers.get_mut(name) {
            c.running = false;
        }
        Ok(())
    }

    async fn start(&self, name: &str) -> Result<(), ContainerError> {
        self.inner.lock().calls.push(ContainerCall::Start(name.to_string()));
        self.maybe_fail("start")?;
        if let Some(c) = self.inner.lock().containers.get_mut(name) {
            c.running = true;
        }
        Ok(())
    }

    async fn restart(&self, name: &str) -> Result<(), ContainerError> {
        self.inner.lock().calls.push(ContainerCall::Restart(name.to_string()));
        self.maybe_fail("restart")
    }

    async fn remove(&self, name: &str) -> Result<(), ContainerError> {
        self.inner.lock().calls.push(ContainerCall::Remove(name.to_string()));
        self.maybe_fail("remove")?;
        self.inner.lock().containers.remove(name);
        Ok(())
    }

    async fn run(&self, argv: &[String]) -> Result<(), ContainerError> {
        self.inner.lock().calls.push(ContainerCall::Run(argv.to_vec()));
        self.maybe_fail("run")?;
        // Derive the name from `--name <value>` the way the real container
        // tool would register it.
        if let Some(pos) = argv.iter().position(|a| a == "--name") {
            if let Some(name) = argv.get(pos + 1) {
                let image = argv.last().cloned().unwrap_or_default();
                self.inner.lock().containers.insert(
                    name.clone(),
                    FakeContainer {
                        image,
                        running: true,
                        inspect: Value::Null,
                    },
                );
            }
        }
        Ok(())
    }

    async fn inspect_running(&self, name: &str) -> Result<bool, ContainerError> {
        self.inner
            .lock()
            .calls
            .push(ContainerCall::InspectRunning(name.to_string()));
        self.maybe_fail("inspect_running")?;
        Ok(self.is_running(name))
    }

    async fn prune_images(&self, repo: &str, keep_tag: &str) -> Result<(), ContainerError> {
        self.inner.lock().calls.push(ContainerCall::PruneImages {
            repo: repo.to_string(),
            keep_tag: keep_tag.to_string(),
        });
        self.maybe_fail("prune_images")
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<ContainerListEntry>, ContainerError> {
        self.inner
            .lock()
            .calls
            .push(ContainerCall::List(filter.map(str::to_string)));
        self.maybe_fail("list")?;
        Ok(self
            .inner
            .lock()
            .containers
            .iter()
            .map(|(name, c)| ContainerListEntry {
                name: name.clone(),
                image: c.image.clone(),
            })
            .collect())
    }

    async fn inspect_json(&self, name: &str) -> Result<Value, ContainerError> {
        self.inner
            .lock()
            .calls
            .push(ContainerCall::InspectJson(name.to_string()));
        self.maybe_fail("inspect_json")?;
        self.inner
            .lock()
            .containers
            .get(name)
            .map(|c| c.inspect.clone())
            .ok_or_else(|| ContainerError::ToolFailed(format!("No such container: {name}")))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
