// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real `ContainerRuntimeAdapter` backed by a subprocess container tool.

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::{info, warn};

use crate::subprocess::{combined_output, run_with_timeout, CONTAINER_TOOL_TIMEOUT};

use super::{
    is_already_running, is_already_stopped_or_removed, ContainerError, ContainerListEntry,
    ContainerRuntimeAdapter,
};

/// Shells to `binary` (e.g. `"docker"` or `"podman"`) for every operation.
pub struct RealContainerAdapter {
    binary: String,
}

impl RealContainerAdapter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd
    }

    async fn run_checked(&self, args: &[&str], description: &str) -> Result<String, ContainerError> {
        let output = run_with_timeout(self.command(args), CONTAINER_TOOL_TIMEOUT, description)
            .await
            .map_err(ContainerError::ToolFailed)?;
        let text = combined_output(&output);
        if !output.status.success() {
            return Err(ContainerError::ToolFailed(text));
        }
        Ok(text)
    }
}

#[async_trait]
impl ContainerRuntimeAdapter for RealContainerAdapter {
    async fn pull(&self, image: &str) -> Result<(), ContainerError> {
        info!(image, "pulling image");
        self.run_checked(&["pull", image], "pull").await?;
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<(), ContainerError> {
        let output = run_with_timeout(
            self.command(&["stop", name]),
            CONTAINER_TOOL_TIMEOUT,
            "stop",
        )
        .await
        .map_err(ContainerError::ToolFailed)?;
        let text = combined_output(&output);
        if output.status.success() || is_already_stopped_or_removed(&text) {
            Ok(())
        } else {
            Err(ContainerError::ToolFailed(text))
        }
    }

    async fn start(&self, name: &str) -> Result<(), ContainerError> {
        let output = run_with_timeout(
            self.command(&["start", name]),
            CONTAINER_TOOL_TIMEOUT,
            "start",
        )
        .await
        .map_err(ContainerError::ToolFailed)?;
        let text = combined_output(&output);
        if output.status.success() || is_already_running(&text) {
            Ok(())
        } else {
            Err(ContainerError::ToolFailed(text))
        }
    }

    async fn restart(&self, name: &str) -> Result<(), ContainerError> {
        self.run_checked(&["restart", name], "restart").await?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), ContainerError> {
        let output = run_with_timeout(
            self.command(&["rm", "-f", name]),
            CONTAINER_TOOL_TIMEOUT,
            "remove",
        )
        .await
        .map_err(ContainerError::ToolFailed)?;
        let text = combined_output(&output);
        if output.status.success() || is_already_stopped_or_removed(&text) {
            Ok(())
        } else {
            Err(ContainerError::ToolFailed(text))
        }
    }

    async fn run(&self, argv: &[String]) -> Result<(), ContainerError> {
        let args: Vec<&str> = argv.iter().map(String::as_str).collect();
        warn!(argv = ?args, "running replacement container");
        self.run_checked(&args, "run").await?;
        Ok(())
    }

    async fn inspect_running(&self, name: &str) -> Result<bool, ContainerError> {
        let output = run_with_timeout(
            self.command(&["inspect", "-f", "{{.State.Running}}", name]),
            CONTAINER_TOOL_TIMEOUT,
            "inspect_running",
        )
        .await
        .map_err(ContainerError::ToolFailed)?;
        if !output.status.success() {
            let text = combined_output(&output);
            if is_already_stopped_or_removed(&text) {
                return Ok(false);
            }
            return Err(ContainerError::ToolFailed(text));
        }
        Ok(combined_output(&output).trim() == "true")
    }

    async fn prune_images(&self, repo: &str, keep_tag: &str) -> Result<(), ContainerError> {
        let entries = self.list(Some(repo)).await?;
        for entry in entries {
            let Some((_, tag)) = entry.image.rsplit_once(':') else {
                continue;
            };
            if tag == keep_tag || tag == "latest" {
                continue;
            }
            if let Err(err) = self.run_checked(&["rmi", &entry.image], "prune image").await {
                warn!(image = %entry.image, error = %err, "failed to prune image");
            }
        }
        Ok(())
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<ContainerListEntry>, ContainerError> {
        let mut args = vec!["ps", "-a", "--format", "{{.Names}}\t{{.Image}}"];
        if let Some(filter) = filter {
            args.push("--filter");
            args.push(filter);
        }
        let text = self.run_checked(&args, "list").await?;
        let entries = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let (name, image) = line.split_once('\t')?;
                Some(ContainerListEntry {
                    name: name.to_string(),
                    image: image.to_string(),
                })
            })
            .collect();
        Ok(entries)
    }

    async fn inspect_json(&self, name: &str) -> Result<Value, ContainerError> {
        let text = self.run_checked(&["inspect", name], "inspect_json").await?;
        let parsed: Vec<Value> =
            serde_json::from_str(&text).map_err(|e| ContainerError::ParseFailed(e.to_string()))?;
        parsed
            .into_iter()
            .next()
            .ok_or_else(|| ContainerError::ParseFailed("empty inspect array".into()))
    }
}
