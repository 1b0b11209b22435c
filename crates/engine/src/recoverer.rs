// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Automated Recoverer (spec §4.C11): on daemon startup, and on a periodic
//! tick, checks the most recent job and the Target's live health, retrying
//! the retryable failure codes automatically and leaving manual-required
//! ones for the operator's playbook.

use std::path::Path;

use pud_adapters::{
    discover_db_location, ContainerRuntimeAdapter, DbConnection, DbExecAdapter, DbLocation, DumpFormat,
    ExternalDbExecutor, HealthResponse, InContainerDbExecutor, TargetClient, TargetClientError,
};
use pud_core::{FailureCode, Job, JobState, RestartPolicy};
use pud_storage::{parse_backup_filename, restore_backup, JobStore, JobStoreError};
use pud_topology::{
    build_upgrade_args, extract_runtime_state, reconcile_env, reconcile_mounts, reconcile_ports,
};
use thiserror::Error;

/// What the recoverer decided to do with the last known job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// No job in flight, or the last job reached a terminal healthy state.
    Noop,
    /// The last job failed with a retryable code; a fresh run should be queued.
    RetryJob { requested_target: String },
    /// The last job failed with a manual-required code; do nothing automatically.
    AwaitOperator { code: FailureCode },
    /// The last job is stuck in a non-terminal state (daemon died mid-upgrade).
    /// Treated as failed with `HEALTHCHECK_FAILED` so the operator is notified.
    OrphanedJob,
}

/// Inspects the most recently persisted job and classifies what to do next.
/// Does not itself enqueue a retry; callers (the daemon's startup routine)
/// act on the returned `RecoveryAction`.
pub fn classify_last_job(job_store: &JobStore) -> Result<RecoveryAction, JobStoreError> {
    let Some(job) = job_store.load_latest()? else {
        return Ok(RecoveryAction::Noop);
    };
    Ok(classify_job(&job))
}

fn classify_job(job: &Job) -> RecoveryAction {
    match job.state {
        JobState::Ready => RecoveryAction::Noop,
        JobState::Failed => {
            let code = FailureCode::parse(&job.failure_code);
            if pud_playbooks::is_retryable(code) {
                RecoveryAction::RetryJob {
                    requested_target: job.requested_target.clone(),
                }
            } else {
                RecoveryAction::AwaitOperator { code }
            }
        }
        _ => RecoveryAction::OrphanedJob,
    }
}

/// Runs a single health-poll tick against the Target (spec §4.C11): used by
/// the daemon's background loop between upgrades to catch a Target that
/// silently went unhealthy outside of any upgrade job.
pub async fn poll_target_health(target: &TargetClient) -> Result<HealthResponse, TargetClientError> {
    target.health().await
}

/// What `apply_recovery` actually did to the container, per the fixed
/// per-code action table (spec §4.C11).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverOutcome {
    /// Nothing to do: no job, or the last job wasn't `Failed`.
    Noop,
    /// A fetch/concurrency failure; nothing touched the container.
    Cleared,
    ContainerStopped,
    ContainerStoppedAndRemoved,
    /// A data-risk code the automated recoverer refuses to touch.
    Refused { code: FailureCode },
}

/// Applies the bounded, idempotent cleanup action for the last failed job
/// (spec §4.C11). Never restarts or re-runs the upgrade itself -- that's
/// left to a fresh `/upgrade/run`.
pub async fn apply_recovery(
    container: &dyn ContainerRuntimeAdapter,
    job_store: &JobStore,
) -> Result<RecoverOutcome, JobStoreError> {
    let Some(job) = job_store.load_latest()? else {
        return Ok(RecoverOutcome::Noop);
    };
    if job.state != JobState::Failed {
        return Ok(RecoverOutcome::Noop);
    }

    let code = FailureCode::parse(&job.failure_code);
    Ok(match code {
        FailureCode::DockerPullFailed => {
            let _ = container.stop(&job.container_name).await;
            RecoverOutcome::ContainerStopped
        }
        FailureCode::DockerError => {
            let _ = container.stop(&job.container_name).await;
            let _ = container.remove(&job.container_name).await;
            RecoverOutcome::ContainerStoppedAndRemoved
        }
        FailureCode::HealthcheckFailed => {
            let _ = container.stop(&job.container_name).await;
            RecoverOutcome::ContainerStopped
        }
        FailureCode::PolicyFetchFailed | FailureCode::ManifestFetchFailed | FailureCode::ConcurrencyBlocked => {
            RecoverOutcome::Cleared
        }
        FailureCode::DiskSpaceLow | FailureCode::SupervisorctlFailed | FailureCode::BackupFailedAfterQuiesce => {
            RecoverOutcome::Refused { code }
        }
        // Highest data-risk code in the taxonomy: never fall through to a
        // generic no-op, even if a future case is added above.
        FailureCode::MigrationFailed => RecoverOutcome::Refused { code },
        _ => RecoverOutcome::Noop,
    })
}

#[derive(Debug, Error)]
pub enum FullRecoveryError {
    #[error("{0} is not a filename this backup manager produced")]
    NotABackupFile(String),
    #[error("backup restore failed: {0}")]
    Restore(#[from] pud_storage::BackupError),
    #[error("container rollback failed: {0}")]
    Rollback(String),
    #[error("could not determine database connection: {0}")]
    DbConfig(String),
}

/// Configuration `full_recovery` needs to rebuild the `container-tool run`
/// argv for the rollback, mirroring `UpgradeConfig`'s shape without pulling
/// in the whole upgrade pipeline.
pub struct FullRecoveryConfig {
    pub container_tool_binary: String,
    pub db_env_file: std::path::PathBuf,
    pub dump_format: DumpFormat,
}

/// Full-recovery variant invoked via the `backup restore --full-recovery`
/// CLI path (spec §4.C11): rolls the container back to the version encoded
/// in the backup filename's `from`, then restores the dump into it.
pub async fn full_recovery(
    container: &dyn ContainerRuntimeAdapter,
    image_repo: &str,
    container_name: &str,
    backup_path: &Path,
    cfg: &FullRecoveryConfig,
) -> Result<(), FullRecoveryError> {
    let filename = backup_path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| FullRecoveryError::NotABackupFile(backup_path.display().to_string()))?;
    let parsed = parse_backup_filename(filename)
        .ok_or_else(|| FullRecoveryError::NotABackupFile(filename.to_string()))?;

    let runtime_state = extract_runtime_state(container, container_name)
        .await
        .map_err(|e| FullRecoveryError::Rollback(e.to_string()))?;

    // Reconciling against an empty manifest delta keeps every inspected
    // port/mount/env entry untouched; only the image tag changes.
    let ports = reconcile_ports(&runtime_state.ports, &[]).unwrap_or_else(|_| runtime_state.ports.clone());
    let mounts = reconcile_mounts(&runtime_state.mounts, &[]);
    let env = reconcile_env(&runtime_state.env, &[]);
    let restart_policy: RestartPolicy = runtime_state.restart_policy.clone();
    let rollback_image_ref = format!("{image_repo}:{}", parsed.from_version);
    let argv = build_upgrade_args(
        container_name,
        &restart_policy,
        &ports,
        &mounts,
        &env,
        &runtime_state.networks,
        &rollback_image_ref,
    );

    container
        .pull(&rollback_image_ref)
        .await
        .map_err(|e| FullRecoveryError::Rollback(e.to_string()))?;
    container
        .stop(container_name)
        .await
        .map_err(|e| FullRecoveryError::Rollback(e.to_string()))?;
    container
        .remove(container_name)
        .await
        .map_err(|e| FullRecoveryError::Rollback(e.to_string()))?;
    container
        .run(&argv)
        .await
        .map_err(|e| FullRecoveryError::Rollback(e.to_string()))?;

    let get_env = |key: &str| std::env::var(key).ok();
    let conn: DbConnection = discover_db_location(&get_env, &runtime_state.env, &cfg.db_env_file)
        .await
        .map_err(|e| FullRecoveryError::DbConfig(e.to_string()))?;
    let db_location = DbLocation::classify(&conn.host, container_name);
    let dbexec: Box<dyn DbExecAdapter> = match &db_location {
        DbLocation::InContainer { container_name } => {
            Box::new(InContainerDbExecutor::new(cfg.container_tool_binary.clone(), container_name.clone()))
        }
        DbLocation::External => Box::new(ExternalDbExecutor),
    };
    restore_backup(dbexec.as_ref(), &conn, backup_path, cfg.dump_format).await?;

    Ok(())
}

#[cfg(test)]
#[path = "recoverer_tests.rs"]
mod tests;
