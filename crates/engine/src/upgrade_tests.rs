// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pud_adapters::FakeContainerAdapter;
use pud_core::{FakeClock, JobId};
use std::path::PathBuf;

fn base_config() -> UpgradeConfig {
    UpgradeConfig {
        policy_location: "/nonexistent/policy.json".to_string(),
        manifest_location: "/nonexistent/manifest.json".to_string(),
        image_repo: "vendor/app".to_string(),
        container_tool_binary: "docker".to_string(),
        container_name_override: None,
        backup_dir: PathBuf::from("/tmp/pud-test-backups"),
        db_env_file: PathBuf::from("/nonexistent/db.env"),
        min_free_backup_bytes: 0,
        dump_format: DumpFormat::Custom,
    }
}

#[tokio::test]
async fn unreachable_policy_fails_the_job_with_policy_fetch_failed() {
    let dir = tempfile::tempdir().unwrap();
    let job_store = JobStore::open(dir.path()).unwrap();
    let container = FakeContainerAdapter::default();
    let client = reqwest::Client::new();
    let clock = FakeClock::new(chrono::Utc::now());

    let mut job = Job::new(
        JobId::new("job-1"),
        Mode::Dashboard,
        "latest".into(),
        "vendor/app".into(),
        "app".into(),
        clock.now(),
    );

    let deps = UpgradeDeps {
        container: &container,
        http_client: &client,
        job_store: &job_store,
        clock: &clock,
    };

    run_upgrade(&mut job, &deps, &base_config()).await.unwrap();

    assert_eq!(job.state, JobState::Failed);
    assert_eq!(job.failure_code, "POLICY_FETCH_FAILED");
}

#[tokio::test]
async fn plan_with_unreachable_policy_reports_failed_state() {
    let container = FakeContainerAdapter::default();
    let client = reqwest::Client::new();

    let plan = plan_upgrade(&container, &client, Mode::Dashboard, "latest", &base_config()).await;

    assert_eq!(plan.state, PlanState::Failed);
    assert_eq!(plan.failure_code, Some(FailureCode::PolicyFetchFailed));
}
