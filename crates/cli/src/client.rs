// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for `pudd`'s loopback control plane (spec §6).

use std::time::Duration;

use pud_core::{FailureCode, Job, JobState, Mode};
use pud_daemon::handlers::{
    ConcurrencyBlockedResponse, PlanResponse, RecoverResponse, RestoreRequest, RestoreResponse,
    RunAcceptedResponse, StatusResponse, SyncResponse, UpgradeRequest,
};
use pud_engine::InspectionReport;
use thiserror::Error;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// Timeout for a single control-plane request.
pub fn request_timeout() -> Duration {
    parse_duration_ms("PUD_TIMEOUT_MS").unwrap_or(Duration::from_secs(15))
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach pudd: {0}")]
    Connect(#[from] reqwest::Error),
    #[error("pudd refused: another upgrade job is already running ({job_id}, state {state})")]
    ConcurrencyBlocked { job_id: String, state: String },
    #[error("pudd has no job recorded yet")]
    NoJob,
    #[error("pudd request failed with status {status}: {body}")]
    Unexpected { status: u16, body: String },
}

/// Thin wrapper over `pudd`'s HTTP control plane. One method per route;
/// callers own presentation and exit-code decisions.
pub struct PudClient {
    http: reqwest::Client,
    base_url: String,
}

impl PudClient {
    pub fn new(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(request_timeout())
            .build()
            .unwrap_or_default();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn plan(&self, mode: Mode, requested_target: &str) -> Result<PlanResponse, ClientError> {
        let req = UpgradeRequest {
            mode,
            requested_target: requested_target.to_string(),
            source: "cli".to_string(),
        };
        let resp = self.http.post(self.url("/upgrade/plan")).json(&req).send().await?;
        Ok(resp.json::<PlanResponse>().await?)
    }

    pub async fn run(&self, mode: Mode, requested_target: &str) -> Result<RunAcceptedResponse, ClientError> {
        let req = UpgradeRequest {
            mode,
            requested_target: requested_target.to_string(),
            source: "cli".to_string(),
        };
        let resp = self.http.post(self.url("/upgrade/run")).json(&req).send().await?;
        if resp.status() == reqwest::StatusCode::CONFLICT {
            let body: ConcurrencyBlockedResponse = resp.json().await?;
            return Err(ClientError::ConcurrencyBlocked {
                job_id: body.job_id,
                state: body.state,
            });
        }
        Ok(resp.json::<RunAcceptedResponse>().await?)
    }

    pub async fn status(&self) -> Result<Option<StatusResponse>, ClientError> {
        let resp = self.http.get(self.url("/upgrade/status")).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(resp.json::<StatusResponse>().await?))
    }

    pub async fn logs(&self) -> Result<String, ClientError> {
        let resp = self.http.get(self.url("/upgrade/logs")).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NoJob);
        }
        Ok(resp.text().await?)
    }

    pub async fn inspect(&self) -> Result<InspectionReport, ClientError> {
        let resp = self.http.get(self.url("/inspect")).send().await?;
        Ok(resp.json::<InspectionReport>().await?)
    }

    pub async fn recover(&self) -> Result<RecoverResponse, ClientError> {
        let resp = self.http.post(self.url("/recover")).send().await?;
        Ok(resp.json::<RecoverResponse>().await?)
    }

    pub async fn sync(&self) -> Result<SyncResponse, ClientError> {
        let resp = self.http.post(self.url("/sync")).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Unexpected { status: status.as_u16(), body });
        }
        Ok(resp.json::<SyncResponse>().await?)
    }

    pub async fn backup_create(&self) -> Result<pud_core::BackupRecord, ClientError> {
        let resp = self.http.post(self.url("/backup/create")).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Unexpected { status: status.as_u16(), body });
        }
        Ok(resp.json::<pud_core::BackupRecord>().await?)
    }

    pub async fn backup_list(&self) -> Result<Vec<pud_core::BackupRecord>, ClientError> {
        let resp = self.http.get(self.url("/backup/list")).send().await?;
        Ok(resp.json::<Vec<pud_core::BackupRecord>>().await?)
    }

    pub async fn backup_restore(&self, file: std::path::PathBuf, full_recovery: bool) -> Result<Option<RestoreResponse>, ClientError> {
        let req = RestoreRequest { file, full_recovery };
        let resp = self.http.post(self.url("/backup/restore")).json(&req).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Unexpected { status: status.as_u16(), body });
        }
        Ok(Some(resp.json::<RestoreResponse>().await?))
    }
}

/// Whether a `Job` represents a failed upgrade, for exit-code purposes (spec §6).
pub fn job_is_failure(job: &Job) -> bool {
    job.state == JobState::Failed
}

/// Formats a job's failure code back into the closed taxonomy for display.
pub fn job_failure_code(job: &Job) -> FailureCode {
    FailureCode::parse(&job.failure_code)
}
