// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inspector (spec §4.C12): a read-only diagnostic sweep. Runs a fixed
//! battery of checks, each independently fallible, and folds the results
//! into an overall state without ever mutating the Job Store or touching
//! the container runtime beyond listing/inspecting.

use std::collections::HashMap;
use std::time::Duration;

use pud_adapters::{fetch_json_document, ContainerRuntimeAdapter, TargetClient};
use pud_core::manifest::Manifest;
use pud_core::policy::Policy;
use pud_core::{FailureCode, Job, JobState};
use pud_storage::JobStore;
use serde::{Deserialize, Serialize};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallState {
    Ok,
    Degraded,
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckResult {
    Pass,
    Fail,
    Unknown,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InspectionReport {
    pub overall_state: OverallState,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub last_job: Option<Job>,
    pub recovery_playbook: Option<pud_core::Playbook>,
    pub checks: HashMap<String, CheckResult>,
}

pub struct InspectorConfig {
    pub policy_location: String,
    pub manifest_location: String,
    pub image_repo: String,
    pub target_base_url: Option<String>,
}

/// Splits a version string into its dot-separated numeric-prefix components
/// (spec §4.C12 version semantics), stripping any leading `v`/`V`.
fn numeric_components(version: &str) -> Vec<u64> {
    let stripped = version.strip_prefix(['v', 'V']).unwrap_or(version);
    stripped
        .split('.')
        .map(|part| {
            part.chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
                .parse::<u64>()
                .unwrap_or(0)
        })
        .collect()
}

/// Lexicographic compare of the numeric-prefix arrays (spec §4.C12).
fn version_less_than(a: &str, b: &str) -> bool {
    numeric_components(a) < numeric_components(b)
}

pub async fn inspect(
    container: &dyn ContainerRuntimeAdapter,
    http_client: &reqwest::Client,
    job_store: &JobStore,
    cfg: &InspectorConfig,
) -> InspectionReport {
    let mut checks = HashMap::new();
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();
    let mut broken = false;
    let mut degraded = false;

    let last_job = job_store.load_latest().ok().flatten();
    match &last_job {
        Some(job) if job.state == JobState::Failed => {
            checks.insert("last_job".to_string(), CheckResult::Fail);
            issues.push(format!("last upgrade job failed: {}", job.failure_code));
            broken = true;
        }
        Some(_) => {
            checks.insert("last_job".to_string(), CheckResult::Pass);
        }
        None => {
            checks.insert("last_job".to_string(), CheckResult::Unknown);
        }
    }

    match container.list(None).await {
        Ok(_) => {
            checks.insert("container_daemon".to_string(), CheckResult::Pass);
        }
        Err(e) => {
            checks.insert("container_daemon".to_string(), CheckResult::Fail);
            issues.push(format!("container daemon unreachable: {e}"));
            broken = true;
        }
    }

    let containers = container.list(Some(&cfg.image_repo)).await.unwrap_or_default();
    if containers.is_empty() {
        checks.insert("target_container".to_string(), CheckResult::Unknown);
        issues.push("no container matching the configured image repo was found".to_string());
        degraded = true;
    } else {
        checks.insert("target_container".to_string(), CheckResult::Pass);
    }

    let policy: Option<Policy> =
        match fetch_json_document(http_client, &cfg.policy_location, FETCH_TIMEOUT).await {
            Ok(p) => {
                checks.insert("policy_fetch".to_string(), CheckResult::Pass);
                Some(p)
            }
            Err(e) => {
                checks.insert("policy_fetch".to_string(), CheckResult::Fail);
                issues.push(format!("policy fetch failed: {e}"));
                degraded = true;
                None
            }
        };

    let _manifest: Option<Manifest> =
        match fetch_json_document(http_client, &cfg.manifest_location, FETCH_TIMEOUT).await {
            Ok(m) => {
                checks.insert("manifest_fetch".to_string(), CheckResult::Pass);
                Some(m)
            }
            Err(e) => {
                checks.insert("manifest_fetch".to_string(), CheckResult::Fail);
                issues.push(format!("manifest fetch failed: {e}"));
                degraded = true;
                None
            }
        };

    let mut running_version = None;
    if let Some(base_url) = &cfg.target_base_url {
        let target = TargetClient::new(http_client.clone(), base_url.clone());
        match target.health().await {
            Ok(health) if health.is_healthy() => {
                checks.insert("health".to_string(), CheckResult::Pass);
            }
            Ok(_) => {
                checks.insert("health".to_string(), CheckResult::Fail);
                issues.push("target reported an unhealthy status".to_string());
                degraded = true;
            }
            Err(e) => {
                checks.insert("health".to_string(), CheckResult::Unknown);
                issues.push(format!("health check failed: {e}"));
                degraded = true;
            }
        }
        match target.version().await {
            Ok(v) => {
                checks.insert("version".to_string(), CheckResult::Pass);
                running_version = Some(v.version);
            }
            Err(e) => {
                checks.insert("version".to_string(), CheckResult::Unknown);
                issues.push(format!("version check failed: {e}"));
                degraded = true;
            }
        }
    }

    if let (Some(running), Some(job)) = (&running_version, &last_job) {
        if !job.resolved_target.is_empty() && job.state == JobState::Ready {
            if version_less_than(running, &job.resolved_target) {
                issues.push(format!(
                    "running version {running} is older than the last successful target {}",
                    job.resolved_target
                ));
                broken = true;
            } else if version_less_than(&job.resolved_target, running) {
                recommendations.push("sync".to_string());
            }
        }
    }
    let _ = policy;

    let overall_state = if broken {
        OverallState::Broken
    } else if degraded {
        OverallState::Degraded
    } else {
        OverallState::Ok
    };

    let recovery_playbook = last_job.as_ref().and_then(|job| {
        if job.state != JobState::Failed {
            return None;
        }
        let code = FailureCode::parse(&job.failure_code);
        let ctx = pud_core::PlaybookContext {
            container_name: job.container_name.clone(),
            backup_path: job.backup_path.clone().unwrap_or_default(),
            image_repo: job.image_repo.clone(),
            ..Default::default()
        };
        pud_playbooks::render_playbook(code, &ctx).ok()
    });

    InspectionReport {
        overall_state,
        issues,
        recommendations,
        last_job,
        recovery_playbook,
        checks,
    }
}

#[cfg(test)]
#[path = "inspector_tests.rs"]
mod tests;
