// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The static playbook registry (spec §4.C7): one entry per `FailureCode`,
//! each carrying the severity/data-risk classification and the SSH recovery
//! steps an operator follows when automated recovery can't.

use pud_core::{DataRisk, FailureCode, Playbook, Severity};
use std::collections::HashMap;
use std::sync::LazyLock;

fn pb(
    code: FailureCode,
    severity: Severity,
    data_risk: DataRisk,
    title: &str,
    user_message: &str,
    ssh_steps: &[&str],
) -> Playbook {
    Playbook {
        code: code.as_str().to_string(),
        severity,
        data_risk,
        title: title.to_string(),
        user_message: user_message.to_string(),
        ssh_steps: ssh_steps.iter().map(|s| s.to_string()).collect(),
        docs_url: None,
        backup_path: None,
    }
}

pub static REGISTRY: LazyLock<HashMap<FailureCode, Playbook>> = LazyLock::new(|| {
    use DataRisk::{Likely, None as NoRisk, Possible, Unknown as UnknownRisk};
    use FailureCode::*;
    use Severity::{Info, ManualRequired, Retryable};

    HashMap::from([
        (
            PolicyFetchFailed,
            pb(
                PolicyFetchFailed,
                Retryable,
                NoRisk,
                "Policy document unreachable",
                "Could not fetch the upgrade policy. This is usually transient network trouble; the daemon will retry automatically.",
                &["curl -fsS {base_url}/policy.json"],
            ),
        ),
        (
            ManifestFetchFailed,
            pb(
                ManifestFetchFailed,
                Retryable,
                NoRisk,
                "Manifest document unreachable",
                "Could not fetch the version manifest. Check connectivity to the manifest host and retry.",
                &["curl -fsS {base_url}/manifest.json"],
            ),
        ),
        (
            ManualUpgradeRequired,
            pb(
                ManualUpgradeRequired,
                ManualRequired,
                NoRisk,
                "Manual upgrade required",
                "The Policy marks this version jump as a breakpoint requiring manual steps before the automated upgrade can proceed.",
                &[
                    "Review the breakpoint notes for {image_repo}",
                    "Perform the documented manual step",
                    "Re-run: pud run --mode manual --to <version>",
                ],
            ),
        ),
        (
            ContainerNameUnresolved,
            pb(
                ContainerNameUnresolved,
                ManualRequired,
                NoRisk,
                "Container name could not be resolved",
                "No container name override and no Manifest default were available to identify the Target container.",
                &["Set PUD_CONTAINER_NAME or add defaults.container_name to the manifest"],
            ),
        ),
        (
            ContainerNotFound,
            pb(
                ContainerNotFound,
                ManualRequired,
                NoRisk,
                "Target container not found",
                "No running container matched the expected image repository on {container_name}.",
                &["docker ps -a --format '{{{{.Names}}}}\\t{{{{.Image}}}}'"],
            ),
        ),
        (
            RuntimeInspectionFailed,
            pb(
                RuntimeInspectionFailed,
                Retryable,
                NoRisk,
                "Runtime inspection failed",
                "Inspecting {container_name} did not return usable JSON.",
                &["docker inspect {container_name}"],
            ),
        ),
        (
            PortConflict,
            pb(
                PortConflict,
                ManualRequired,
                NoRisk,
                "Port conflict while reconciling topology",
                "A manifest-specified port collides with an existing host port mapping on {container_name}.",
                &["docker port {container_name}"],
            ),
        ),
        (
            DockerRunBuildFailed,
            pb(
                DockerRunBuildFailed,
                ManualRequired,
                NoRisk,
                "Could not build the run command",
                "Reconciled topology could not be translated into a run invocation.",
                &["Inspect the job log for the attempted argv"],
            ),
        ),
        (
            DockerPullFailed,
            pb(
                DockerPullFailed,
                Retryable,
                NoRisk,
                "Image pull failed",
                "Pulling {image_repo} failed. Check registry connectivity and credentials.",
                &["docker pull {image_repo}"],
            ),
        ),
        (
            DockerError,
            pb(
                DockerError,
                Retryable,
                NoRisk,
                "Container tool error",
                "The container tool returned an unexpected error.",
                &["docker info"],
            ),
        ),
        (
            DockerDaemonDown,
            pb(
                DockerDaemonDown,
                ManualRequired,
                NoRisk,
                "Container daemon unreachable",
                "The container tool's daemon/socket is not responding.",
                &["systemctl status docker", "systemctl restart docker"],
            ),
        ),
        (
            BackupFailed,
            pb(
                BackupFailed,
                Retryable,
                Possible,
                "Database backup failed",
                "Taking the pre-upgrade backup of {container_name} failed before any destructive step ran.",
                &["df -h", "docker logs {container_name} --tail 200"],
            ),
        ),
        (
            BackupTimeout,
            pb(
                BackupTimeout,
                ManualRequired,
                Possible,
                "Database backup timed out",
                "The backup of {container_name} exceeded its time budget.",
                &["ls -la {backup_path}"],
            ),
        ),
        (
            HealthcheckFailed,
            pb(
                HealthcheckFailed,
                ManualRequired,
                Likely,
                "Post-upgrade healthcheck failed",
                "{container_name} did not report healthy after the upgrade. Data may be in a partially migrated state.",
                &[
                    "curl -fsS {base_url}/health",
                    "docker logs {container_name} --tail 500",
                ],
            ),
        ),
        (
            VersionMismatch,
            pb(
                VersionMismatch,
                ManualRequired,
                Possible,
                "Running version does not match target",
                "{container_name} reports a version different from the one requested.",
                &["curl -fsS {base_url}/version"],
            ),
        ),
        (
            MigrationTimeout,
            pb(
                MigrationTimeout,
                ManualRequired,
                Likely,
                "Database migrations timed out",
                "Migrations on {container_name} did not report complete within the migration budget.",
                &["curl -fsS {base_url}/admin/migrations/status"],
            ),
        ),
        (
            MigrationFailed,
            pb(
                MigrationFailed,
                ManualRequired,
                Likely,
                "Database migrations failed",
                "{container_name} reported a failed migration state.",
                &[
                    "curl -fsS {base_url}/admin/migrations/status",
                    "Restore from {backup_path} if a rollback is needed",
                ],
            ),
        ),
        (
            ConcurrencyBlocked,
            pb(
                ConcurrencyBlocked,
                Info,
                NoRisk,
                "Another upgrade is already running",
                "The upgrade engine is already executing a job for {container_name}; this request was rejected.",
                &["pud status"],
            ),
        ),
        (
            DiskSpaceLow,
            pb(
                DiskSpaceLow,
                ManualRequired,
                NoRisk,
                "Insufficient disk space",
                "Not enough free space was available to safely take a backup before upgrading {container_name}.",
                &["df -h", "pud backup list"],
            ),
        ),
        (
            InvalidDbConfig,
            pb(
                InvalidDbConfig,
                ManualRequired,
                NoRisk,
                "Database connection details could not be determined",
                "No database location could be discovered for {container_name} via env override, container env, or the persisted db.env file.",
                &["docker exec {container_name} env | grep -i DB_"],
            ),
        ),
        (
            PayramContainerNotFound,
            pb(
                PayramContainerNotFound,
                ManualRequired,
                NoRisk,
                "No matching Payram container found",
                "No container image matched the expected repository with a parseable version tag.",
                &["docker ps -a --format '{{{{.Names}}}}\\t{{{{.Image}}}}'"],
            ),
        ),
        (
            PayramCorePortNotFound,
            pb(
                PayramCorePortNotFound,
                ManualRequired,
                NoRisk,
                "Core HTTP port could not be identified",
                "None of {container_name}'s exposed TCP ports answered the core welcome probe.",
                &["curl -v http://localhost:<port>/"],
            ),
        ),
        (
            SupervisorctlFailed,
            pb(
                SupervisorctlFailed,
                ManualRequired,
                NoRisk,
                "supervisorctl invocation failed",
                "A supervisorctl step inside {container_name} failed to complete.",
                &["docker exec {container_name} supervisorctl status"],
            ),
        ),
        (
            BackupFailedAfterQuiesce,
            pb(
                BackupFailedAfterQuiesce,
                ManualRequired,
                Likely,
                "Backup failed after quiescing the database",
                "{container_name}'s database was quiesced for backup but the dump itself failed, leaving it in a quiesced state.",
                &[
                    "docker exec {container_name} pg_isready",
                    "Restart {container_name} to lift the quiesce if the dump cannot be retried",
                ],
            ),
        ),
        (
            Unknown,
            pb(
                Unknown,
                ManualRequired,
                UnknownRisk,
                "Unrecognized failure code",
                "The job failed with a code this daemon doesn't recognize; it may have been persisted by a newer version. Data risk cannot be determined automatically.",
                &["pud status", "pud logs"],
            ),
        ),
    ])
});

/// Substitutes `{placeholder}` tokens in `template` from `ctx`. Unknown
/// placeholders and empty context fields are left untouched.
pub(crate) fn substitute(template: &str, ctx: &pud_core::PlaybookContext) -> String {
    let mut out = template.to_string();
    for (key, value) in [
        ("{container_name}", &ctx.container_name),
        ("{base_url}", &ctx.base_url),
        ("{http_port}", &ctx.http_port),
        ("{db_port}", &ctx.db_port),
        ("{image_repo}", &ctx.image_repo),
        ("{backup_path}", &ctx.backup_path),
    ] {
        if !value.is_empty() {
            out = out.replace(key, value);
        }
    }
    out
}
