// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target Application Client (spec §4.C4): health/version/migrations, lenient
//! JSON parsing so the updater stays forward-compatible with newer Targets.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum TargetClientError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("non-200 response: {0}")]
    NonSuccessStatus(u16),
    #[error("failed to decode JSON: {0}")]
    DecodeFailed(String),
}

/// Lenient: unknown fields are ignored by `serde`'s default behavior, and
/// `db` is optional because older Targets don't report it.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub db: Option<String>,
}

impl HealthResponse {
    /// Healthy iff `status == "ok"` and (`db` absent or `db == "ok"`) (spec §4.C4).
    pub fn is_healthy(&self) -> bool {
        self.status == "ok" && self.db.as_deref().map(|db| db == "ok").unwrap_or(true)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationsState {
    Complete,
    Running,
    Failed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MigrationsResponse {
    pub state: MigrationsState,
}

pub struct TargetClient {
    client: reqwest::Client,
    base_url: String,
}

impl TargetClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<T, TargetClientError> {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await
            .map_err(|e| TargetClientError::RequestFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TargetClientError::NonSuccessStatus(response.status().as_u16()));
        }
        response
            .json()
            .await
            .map_err(|e| TargetClientError::DecodeFailed(e.to_string()))
    }

    pub async fn health(&self) -> Result<HealthResponse, TargetClientError> {
        self.get_json("/health").await
    }

    pub async fn version(&self) -> Result<VersionResponse, TargetClientError> {
        self.get_json("/version").await
    }

    pub async fn migrations_status(&self) -> Result<MigrationsResponse, TargetClientError> {
        self.get_json("/admin/migrations/status").await
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
