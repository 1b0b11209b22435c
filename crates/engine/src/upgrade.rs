// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upgrade Engine (spec §4.C10): drives a `Job` through its state machine,
//! delegating each phase to the adapters/topology/storage/playbooks crates
//! and mapping every subsystem error onto a `FailureCode` at the boundary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pud_adapters::{
    discover_db_location, DbConnection, DbExecAdapter, DbLocation, DumpFormat, ExternalDbExecutor,
    InContainerDbExecutor, TargetClient,
};
use pud_adapters::{fetch_json_document, ContainerRuntimeAdapter};
use pud_core::manifest::Manifest;
use pud_core::policy::Policy;
use pud_core::{BackupMeta, Clock, FailureCode, Job, JobState, Mode, RestartPolicy};
use pud_storage::JobStore;
use pud_topology::{
    build_upgrade_args, discover_target_container, extract_runtime_state, identify_core_port,
    reconcile_env, reconcile_mounts, reconcile_ports, resolve_container_name,
};
use thiserror::Error;

const DOCUMENT_TIMEOUT: Duration = Duration::from_secs(10);
/// Migration completion budget and poll interval (spec Open Question: 30s / 2s).
const MIGRATION_BUDGET: Duration = Duration::from_secs(30);
const MIGRATION_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum UpgradeError {
    #[error("job failed with {0}")]
    Failed(FailureCode),
}

pub struct UpgradeConfig {
    pub policy_location: String,
    pub manifest_location: String,
    pub image_repo: String,
    pub container_tool_binary: String,
    pub container_name_override: Option<String>,
    pub backup_dir: PathBuf,
    pub db_env_file: PathBuf,
    pub min_free_backup_bytes: u64,
    pub dump_format: DumpFormat,
}

pub struct UpgradeDeps<'a> {
    pub container: &'a dyn ContainerRuntimeAdapter,
    pub http_client: &'a reqwest::Client,
    pub job_store: &'a JobStore,
    pub clock: &'a dyn Clock,
}

/// Drives `job` through every phase to `Ready` or `Failed`. Persists the job
/// after each transition so a daemon restart can resume from the last
/// recorded state. Returns `Ok(())` even when the job ends in `Failed` --
/// `UpgradeError` is only for the rare case persistence itself is broken.
pub async fn run_upgrade(
    job: &mut Job,
    deps: &UpgradeDeps<'_>,
    cfg: &UpgradeConfig,
) -> Result<(), UpgradeError> {
    macro_rules! fail {
        ($code:expr, $msg:expr) => {{
            job.fail($code, $msg, deps.clock.now());
            deps.job_store.save(job).ok();
            return Ok(());
        }};
    }

    macro_rules! advance {
        ($state:expr) => {{
            if job.transition($state, deps.clock.now()).is_err() {
                return Ok(());
            }
            deps.job_store.save(job).ok();
        }};
    }

    advance!(JobState::PolicyFetching);
    let policy: Policy =
        match fetch_json_document(deps.http_client, &cfg.policy_location, DOCUMENT_TIMEOUT).await {
            Ok(p) => p,
            Err(e) => fail!(FailureCode::PolicyFetchFailed, e.to_string()),
        };

    let resolved_target = if job.requested_target == "latest" {
        policy.latest.clone()
    } else {
        job.requested_target.clone()
    };
    if !policy.is_known_release(&resolved_target) {
        fail!(
            FailureCode::PolicyFetchFailed,
            format!("{resolved_target} is not a known release")
        );
    }
    if let Some(breakpoint) = policy.breakpoint_for(&resolved_target) {
        if job.mode != Mode::Manual {
            fail!(FailureCode::ManualUpgradeRequired, breakpoint.reason.clone());
        }
    }
    job.resolved_target = resolved_target.clone();

    advance!(JobState::ManifestFetching);
    let manifest: Manifest =
        match fetch_json_document(deps.http_client, &cfg.manifest_location, DOCUMENT_TIMEOUT).await {
            Ok(m) => m,
            Err(e) => fail!(FailureCode::ManifestFetchFailed, e.to_string()),
        };
    let defaults = manifest.effective_defaults(&resolved_target);

    let resolved_name = match resolve_container_name(cfg.container_name_override.as_deref(), &defaults.container_name) {
        Ok(name) => name,
        Err(_) => fail!(FailureCode::ContainerNameUnresolved, "could not resolve the target container name"),
    };
    job.container_name = resolved_name.clone();

    // Backup tagging needs the currently running version and DB connection,
    // which requires its own inspection ahead of Executing -- this is
    // distinct from Executing step 1's inspection below, which re-checks the
    // container's topology immediately before it is replaced, in case the
    // backup took long enough for anything to have changed underneath it.
    advance!(JobState::BackingUp);
    let discovered_name = match discover_target_container(deps.container, &cfg.image_repo).await {
        Ok(name) => name,
        Err(_) => fail!(FailureCode::PayramContainerNotFound, "no matching container found"),
    };
    let pre_backup_state = match extract_runtime_state(deps.container, &discovered_name).await {
        Ok(rs) => rs,
        Err(e) => fail!(FailureCode::RuntimeInspectionFailed, e.to_string()),
    };

    let get_env = |key: &str| std::env::var(key).ok();
    let conn: DbConnection =
        match discover_db_location(&get_env, &pre_backup_state.env, &cfg.db_env_file).await {
            Ok(c) => c,
            Err(_) => fail!(FailureCode::InvalidDbConfig, "could not determine database connection"),
        };
    let db_location = DbLocation::classify(&conn.host, &resolved_name);
    let dbexec: Box<dyn DbExecAdapter> = match &db_location {
        DbLocation::InContainer { container_name } => {
            Box::new(InContainerDbExecutor::new(cfg.container_tool_binary.clone(), container_name.clone()))
        }
        DbLocation::External => Box::new(ExternalDbExecutor),
    };
    let meta = BackupMeta {
        from_version: pre_backup_state
            .image
            .rsplit_once(':')
            .map(|(_, tag)| tag.to_string())
            .unwrap_or_default(),
        to_version: resolved_target.clone(),
        job_id: job.id.as_str().to_string(),
    };
    let backup = match pud_storage::create_backup(
        dbexec.as_ref(),
        &conn,
        &meta,
        &cfg.backup_dir,
        cfg.dump_format,
        cfg.min_free_backup_bytes,
    )
    .await
    {
        Ok(record) => record,
        Err(pud_storage::BackupError::DiskSpaceLow { .. }) => fail!(FailureCode::DiskSpaceLow, "insufficient disk space for backup"),
        Err(e) => fail!(FailureCode::BackupFailed, e.to_string()),
    };
    job.backup_path = Some(backup.path.clone());
    deps.job_store.save(job).ok();

    advance!(JobState::Executing);
    // Steps 1-2 of Executing (spec §4.C10): inspect the container as it
    // stands right now and build the next-run argv from it. A failure here
    // belongs to Executing, not to whatever phase ran before the backup.
    let discovered_name = match discover_target_container(deps.container, &cfg.image_repo).await {
        Ok(name) => name,
        Err(_) => fail!(FailureCode::PayramContainerNotFound, "no matching container found"),
    };
    let runtime_state = match extract_runtime_state(deps.container, &discovered_name).await {
        Ok(rs) => rs,
        Err(e) => fail!(FailureCode::RuntimeInspectionFailed, e.to_string()),
    };
    let ports = match reconcile_ports(&runtime_state.ports, &defaults.ports) {
        Ok(p) => p,
        Err(_) => fail!(FailureCode::PortConflict, "manifest port collides with an existing mapping"),
    };
    let mounts = reconcile_mounts(&runtime_state.mounts, &defaults.volumes);
    let env = reconcile_env(&runtime_state.env, &defaults.env);
    let restart_policy = if defaults.restart_policy.is_empty() {
        runtime_state.restart_policy.clone()
    } else {
        RestartPolicy {
            name: defaults.restart_policy.clone(),
            maximum_retry_count: runtime_state.restart_policy.maximum_retry_count,
        }
    };
    let new_image_ref = format!("{}:{resolved_target}", cfg.image_repo);
    let argv = build_upgrade_args(
        &resolved_name,
        &restart_policy,
        &ports,
        &mounts,
        &env,
        &runtime_state.networks,
        &new_image_ref,
    );

    if let Err(e) = deps.container.pull(&new_image_ref).await {
        fail!(FailureCode::DockerPullFailed, e.to_string());
    }
    if let Err(e) = deps.container.stop(&discovered_name).await {
        fail!(FailureCode::DockerError, e.to_string());
    }
    if let Err(e) = deps.container.remove(&discovered_name).await {
        fail!(FailureCode::DockerError, e.to_string());
    }
    if let Err(e) = deps.container.run(&argv).await {
        fail!(FailureCode::DockerRunBuildFailed, e.to_string());
    }

    advance!(JobState::Verifying);
    let core_port = match identify_core_port(&runtime_state).await {
        Ok(port) => port,
        Err(_) => fail!(FailureCode::PayramCorePortNotFound, "no exposed port answered the core welcome probe"),
    };
    let base_url = format!("http://localhost:{core_port}");
    let target = TargetClient::new(deps.http_client.clone(), base_url);

    match target.health().await {
        Ok(health) if health.is_healthy() => {}
        _ => fail!(FailureCode::HealthcheckFailed, "target did not report healthy after upgrade"),
    }
    match target.version().await {
        Ok(v) if v.version == resolved_target => {}
        _ => fail!(FailureCode::VersionMismatch, "running version does not match the requested target"),
    }
    if let Err(code) = wait_for_migrations(&target).await {
        fail!(code, "database migrations did not complete");
    }

    advance!(JobState::Ready);
    let _ = deps.container.prune_images(&cfg.image_repo, &resolved_target).await;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    Ok,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PlanResult {
    pub state: PlanState,
    pub resolved_target: String,
    pub failure_code: Option<FailureCode>,
    pub message: Option<String>,
}

impl PlanResult {
    fn failed(code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            state: PlanState::Failed,
            resolved_target: String::new(),
            failure_code: Some(code),
            message: Some(message.into()),
        }
    }
}

/// Read-only dry run (spec §6 `/upgrade/plan`): resolves the requested target
/// against policy, then walks the same discovery/reconciliation pipeline
/// `run_upgrade` would use, without ever touching the container runtime's
/// mutating calls, the backup subsystem, or the Job Store.
pub async fn plan_upgrade(
    container: &dyn ContainerRuntimeAdapter,
    http_client: &reqwest::Client,
    mode: Mode,
    requested_target: &str,
    cfg: &UpgradeConfig,
) -> PlanResult {
    let policy: Policy = match fetch_json_document(http_client, &cfg.policy_location, DOCUMENT_TIMEOUT).await {
        Ok(p) => p,
        Err(e) => return PlanResult::failed(FailureCode::PolicyFetchFailed, e.to_string()),
    };

    let resolved_target = if requested_target == "latest" {
        policy.latest.clone()
    } else {
        requested_target.to_string()
    };
    if !policy.is_known_release(&resolved_target) {
        return PlanResult::failed(
            FailureCode::PolicyFetchFailed,
            format!("{resolved_target} is not a known release"),
        );
    }
    if let Some(breakpoint) = policy.breakpoint_for(&resolved_target) {
        if mode != Mode::Manual {
            return PlanResult::failed(FailureCode::ManualUpgradeRequired, breakpoint.reason.clone());
        }
    }

    let manifest: Manifest = match fetch_json_document(http_client, &cfg.manifest_location, DOCUMENT_TIMEOUT).await {
        Ok(m) => m,
        Err(e) => return PlanResult::failed(FailureCode::ManifestFetchFailed, e.to_string()),
    };
    let defaults = manifest.effective_defaults(&resolved_target);

    let discovered_name = match discover_target_container(container, &cfg.image_repo).await {
        Ok(name) => name,
        Err(_) => return PlanResult::failed(FailureCode::PayramContainerNotFound, "no matching container found"),
    };
    let runtime_state = match extract_runtime_state(container, &discovered_name).await {
        Ok(rs) => rs,
        Err(e) => return PlanResult::failed(FailureCode::RuntimeInspectionFailed, e.to_string()),
    };
    if reconcile_ports(&runtime_state.ports, &defaults.ports).is_err() {
        return PlanResult::failed(FailureCode::PortConflict, "manifest port collides with an existing mapping");
    }

    PlanResult {
        state: PlanState::Ok,
        resolved_target,
        failure_code: None,
        message: None,
    }
}

async fn wait_for_migrations(target: &TargetClient) -> Result<(), FailureCode> {
    use pud_adapters::MigrationsState;

    let deadline = tokio::time::Instant::now() + MIGRATION_BUDGET;
    loop {
        match target.migrations_status().await {
            Ok(status) => match status.state {
                MigrationsState::Complete => return Ok(()),
                MigrationsState::Failed => return Err(FailureCode::MigrationFailed),
                MigrationsState::Running => {}
            },
            Err(_) => {}
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(FailureCode::MigrationTimeout);
        }
        tokio::time::sleep(MIGRATION_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
#[path = "upgrade_tests.rs"]
mod tests;
