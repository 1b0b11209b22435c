// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the loopback control plane (spec §6).

use std::path::PathBuf;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pud_adapters::{discover_db_location, DbConnection, DbExecAdapter, DbLocation, ExternalDbExecutor, InContainerDbExecutor, TargetClient};
use pud_core::{BackupMeta, BackupRecord, Clock, FailureCode, Job, JobId, Mode};
use pud_engine::{plan_upgrade, run_upgrade, InspectorConfig, PlanState, RecoverOutcome, UpgradeConfig, UpgradeDeps};
use pud_topology::{discover_target_container, extract_runtime_state, identify_core_port};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::state::SharedState;

fn upgrade_config(state: &SharedState) -> UpgradeConfig {
    UpgradeConfig {
        policy_location: state.config.policy_location.clone(),
        manifest_location: state.config.manifest_location.clone(),
        image_repo: state.config.image_repo.clone(),
        container_tool_binary: state.config.container_tool_binary.clone(),
        container_name_override: state.config.container_name_override.clone(),
        backup_dir: state.config.backup_dir.clone(),
        db_env_file: state.config.db_env_file.clone(),
        min_free_backup_bytes: state.config.min_free_backup_bytes,
        dump_format: state.config.dump_format,
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpgradeRequest {
    pub mode: Mode,
    pub requested_target: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub state: &'static str,
    pub resolved_target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn plan(State(state): State<SharedState>, Json(req): Json<UpgradeRequest>) -> impl IntoResponse {
    let cfg = upgrade_config(&state);
    let result = plan_upgrade(
        state.container.as_ref(),
        &state.http_client,
        req.mode,
        &req.requested_target,
        &cfg,
    )
    .await;

    let response = PlanResponse {
        state: match result.state {
            PlanState::Ok => "OK",
            PlanState::Failed => "FAILED",
        },
        resolved_target: result.resolved_target,
        failure_code: result.failure_code.map(|c| c.to_string()),
        message: result.message,
    };
    Json(response)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunAcceptedResponse {
    pub job_id: String,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConcurrencyBlockedResponse {
    pub error: &'static str,
    pub job_id: String,
    pub state: String,
}

pub async fn run(State(state): State<SharedState>, Json(req): Json<UpgradeRequest>) -> Response {
    let job_id = JobId::new(uuid::Uuid::new_v4().to_string());
    let handle = match state.gate.try_acquire(job_id.clone()) {
        Ok(handle) => handle,
        Err(active) => {
            let existing = state
                .job_store
                .load(&active)
                .ok()
                .flatten()
                .map(|j| j.state.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            return (
                StatusCode::CONFLICT,
                Json(ConcurrencyBlockedResponse {
                    error: "CONCURRENCY_BLOCKED",
                    job_id: active.as_str().to_string(),
                    state: existing,
                }),
            )
                .into_response();
        }
    };

    let mut job = Job::new(
        job_id.clone(),
        req.mode,
        req.requested_target.clone(),
        state.config.image_repo.clone(),
        state.config.container_name_override.clone().unwrap_or_default(),
        state.clock.now(),
    );
    if let Err(e) = state.job_store.save(&job) {
        warn!(error = %e, "failed to persist job before starting upgrade");
    }

    let response = Json(RunAcceptedResponse {
        job_id: job_id.as_str().to_string(),
        state: job.state.to_string(),
    })
    .into_response();

    let state = state.clone();
    tokio::spawn(async move {
        let _handle = handle;
        let cfg = upgrade_config(&state);
        let deps = UpgradeDeps {
            container: state.container.as_ref(),
            http_client: &state.http_client,
            job_store: state.job_store.as_ref(),
            clock: &state.clock,
        };
        info!(job_id = %job.id.as_str(), "starting upgrade job");
        if let Err(e) = run_upgrade(&mut job, &deps, &cfg).await {
            warn!(job_id = %job.id.as_str(), error = %e, "upgrade job ended with an internal error");
        }
        info!(job_id = %job.id.as_str(), state = %job.state, "upgrade job finished");
    });

    response
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_playbook: Option<pud_core::Playbook>,
}

pub async fn status(State(state): State<SharedState>) -> Response {
    match state.job_store.load_latest() {
        Ok(Some(job)) => {
            let recovery_playbook = if job.state == pud_core::JobState::Failed {
                let code = FailureCode::parse(&job.failure_code);
                let ctx = pud_core::PlaybookContext {
                    container_name: job.container_name.clone(),
                    backup_path: job.backup_path.clone().unwrap_or_default(),
                    image_repo: job.image_repo.clone(),
                    ..Default::default()
                };
                pud_playbooks::render_playbook(code, &ctx).ok()
            } else {
                None
            };
            Json(StatusResponse { job, recovery_playbook }).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

pub async fn logs(State(state): State<SharedState>) -> Response {
    let Ok(Some(job)) = state.job_store.load_latest() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match state.job_store.read_log(&job.id) {
        Ok(lines) => lines.join("\n").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Best-effort discovery of the currently-running Target's base URL, used by
/// `inspect`/`sync` to reach `/health` and `/version`. Returns `None` rather
/// than failing the whole sweep when the container can't be found.
async fn discover_target_base_url(state: &SharedState) -> Option<String> {
    let name = discover_target_container(state.container.as_ref(), &state.config.image_repo)
        .await
        .ok()?;
    let runtime_state = extract_runtime_state(state.container.as_ref(), &name).await.ok()?;
    let port = identify_core_port(&runtime_state).await.ok()?;
    Some(format!("http://localhost:{port}"))
}

pub async fn inspect(State(state): State<SharedState>) -> Response {
    let target_base_url = discover_target_base_url(&state).await;
    let cfg = InspectorConfig {
        policy_location: state.config.policy_location.clone(),
        manifest_location: state.config.manifest_location.clone(),
        image_repo: state.config.image_repo.clone(),
        target_base_url,
    };
    let report = pud_engine::inspect(state.container.as_ref(), &state.http_client, state.job_store.as_ref(), &cfg).await;
    Json(report).into_response()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecoverResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<String>,
}

pub async fn recover(State(state): State<SharedState>) -> Response {
    match pud_engine::apply_recovery(state.container.as_ref(), state.job_store.as_ref()).await {
        Ok(RecoverOutcome::Noop) => Json(RecoverResponse { outcome: "NOOP", failure_code: None }).into_response(),
        Ok(RecoverOutcome::Cleared) => Json(RecoverResponse { outcome: "CLEARED", failure_code: None }).into_response(),
        Ok(RecoverOutcome::ContainerStopped) => {
            Json(RecoverResponse { outcome: "CONTAINER_STOPPED", failure_code: None }).into_response()
        }
        Ok(RecoverOutcome::ContainerStoppedAndRemoved) => Json(RecoverResponse {
            outcome: "CONTAINER_STOPPED_AND_REMOVED",
            failure_code: None,
        })
        .into_response(),
        Ok(RecoverOutcome::Refused { code }) => (
            StatusCode::CONFLICT,
            Json(RecoverResponse {
                outcome: "REFUSED",
                failure_code: Some(code.to_string()),
            }),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub resolved_target: String,
}

/// Records an externally-upgraded running version as a completed job, so
/// later `inspect` sweeps stop recommending `sync` (spec §4.C12).
pub async fn sync(State(state): State<SharedState>) -> Response {
    let Some(name) = discover_target_container(state.container.as_ref(), &state.config.image_repo)
        .await
        .ok()
    else {
        return (StatusCode::NOT_FOUND, "no matching container found").into_response();
    };
    let Ok(runtime_state) = extract_runtime_state(state.container.as_ref(), &name).await else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "failed to inspect running container").into_response();
    };
    let Ok(port) = identify_core_port(&runtime_state).await else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "no exposed port answered the core welcome probe").into_response();
    };
    let target = TargetClient::new(state.http_client.clone(), format!("http://localhost:{port}"));
    let Ok(version) = target.version().await else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "failed to query running version").into_response();
    };

    let now = state.clock.now();
    let mut job = Job::new(
        JobId::new(uuid::Uuid::new_v4().to_string()),
        Mode::Dashboard,
        version.version.clone(),
        state.config.image_repo.clone(),
        name,
        now,
    );
    job.resolved_target = version.version.clone();
    if job.transition(pud_core::JobState::Ready, now).is_ok() {
        if let Err(e) = state.job_store.save(&job) {
            warn!(error = %e, "failed to persist synced job");
        }
    }

    Json(SyncResponse { resolved_target: version.version }).into_response()
}

async fn discover_db_connection(state: &SharedState, env: &[String]) -> Option<DbConnection> {
    let get_env = |key: &str| std::env::var(key).ok();
    discover_db_location(&get_env, env, &state.config.db_env_file).await.ok()
}

fn dbexec_for(state: &SharedState, conn: &DbConnection, container_name: &str) -> Box<dyn DbExecAdapter> {
    match DbLocation::classify(&conn.host, container_name) {
        DbLocation::InContainer { container_name } => {
            Box::new(InContainerDbExecutor::new(state.config.container_tool_binary.clone(), container_name))
        }
        DbLocation::External => Box::new(ExternalDbExecutor),
    }
}

pub async fn backup_create(State(state): State<SharedState>) -> Response {
    let Some(name) = discover_target_container(state.container.as_ref(), &state.config.image_repo)
        .await
        .ok()
    else {
        return (StatusCode::NOT_FOUND, "no matching container found").into_response();
    };
    let Ok(runtime_state) = extract_runtime_state(state.container.as_ref(), &name).await else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "failed to inspect running container").into_response();
    };
    let Some(conn) = discover_db_connection(&state, &runtime_state.env).await else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_DB_CONFIG").into_response();
    };
    let dbexec = dbexec_for(&state, &conn, &name);

    let version = runtime_state
        .image
        .rsplit_once(':')
        .map(|(_, tag)| tag.to_string())
        .unwrap_or_default();
    let meta = BackupMeta {
        from_version: version.clone(),
        to_version: version,
        job_id: "manual".to_string(),
    };

    match pud_storage::create_backup(
        dbexec.as_ref(),
        &conn,
        &meta,
        &state.config.backup_dir,
        state.config.dump_format,
        state.config.min_free_backup_bytes,
    )
    .await
    {
        Ok(record) => Json(record).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

pub async fn backup_list(State(state): State<SharedState>) -> Response {
    match pud_storage::list_backups(&state.config.backup_dir) {
        Ok(records) => Json(records).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RestoreRequest {
    pub file: PathBuf,
    #[serde(default)]
    pub full_recovery: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RestoreResponse {
    pub restored: BackupRecord,
}

pub async fn backup_restore(State(state): State<SharedState>, Json(req): Json<RestoreRequest>) -> Response {
    let Some(name) = discover_target_container(state.container.as_ref(), &state.config.image_repo)
        .await
        .ok()
    else {
        return (StatusCode::NOT_FOUND, "no matching container found").into_response();
    };

    if req.full_recovery {
        let full_recovery_cfg = pud_engine::FullRecoveryConfig {
            container_tool_binary: state.config.container_tool_binary.clone(),
            db_env_file: state.config.db_env_file.clone(),
            dump_format: state.config.dump_format,
        };
        if let Err(e) = pud_engine::full_recovery(
            state.container.as_ref(),
            &state.config.image_repo,
            &name,
            &req.file,
            &full_recovery_cfg,
        )
        .await
        {
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    } else {
        let Ok(runtime_state) = extract_runtime_state(state.container.as_ref(), &name).await else {
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to inspect running container").into_response();
        };
        let Some(conn) = discover_db_connection(&state, &runtime_state.env).await else {
            return (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_DB_CONFIG").into_response();
        };
        let dbexec = dbexec_for(&state, &conn, &name);
        if let Err(e) = pud_storage::restore_backup(dbexec.as_ref(), &conn, &req.file, state.config.dump_format).await {
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    }

    match pud_storage::list_backups(&state.config.backup_dir)
        .ok()
        .and_then(|records| records.into_iter().find(|r| PathBuf::from(&r.path) == req.file))
    {
        Some(restored) => Json(RestoreResponse { restored }).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
