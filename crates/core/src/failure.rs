// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed failure-code taxonomy (spec §4.C7 / §7).
//!
//! Every engine phase that can fail attributes exactly one of these codes.
//! Subsystem-level `thiserror` errors in `pud-adapters`/`pud-topology` get
//! mapped onto one of these at the phase boundary in `pud-engine`; this enum
//! is never the error type `?` propagates through, only the final
//! classification stored on the `Job`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    PolicyFetchFailed,
    ManifestFetchFailed,
    ManualUpgradeRequired,
    ContainerNameUnresolved,
    ContainerNotFound,
    RuntimeInspectionFailed,
    PortConflict,
    DockerRunBuildFailed,
    DockerPullFailed,
    DockerError,
    DockerDaemonDown,
    BackupFailed,
    BackupTimeout,
    HealthcheckFailed,
    VersionMismatch,
    MigrationTimeout,
    MigrationFailed,
    ConcurrencyBlocked,
    DiskSpaceLow,
    InvalidDbConfig,
    PayramContainerNotFound,
    PayramCorePortNotFound,
    SupervisorctlFailed,
    BackupFailedAfterQuiesce,
    /// Any code not in this set, kept for forward compatibility with
    /// playbooks that must degrade gracefully rather than panic.
    Unknown,
}

impl FailureCode {
    /// The wire/string form used in `Job::failure_code` and playbook lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PolicyFetchFailed => "POLICY_FETCH_FAILED",
            Self::ManifestFetchFailed => "MANIFEST_FETCH_FAILED",
            Self::ManualUpgradeRequired => "MANUAL_UPGRADE_REQUIRED",
            Self::ContainerNameUnresolved => "CONTAINER_NAME_UNRESOLVED",
            Self::ContainerNotFound => "CONTAINER_NOT_FOUND",
            Self::RuntimeInspectionFailed => "RUNTIME_INSPECTION_FAILED",
            Self::PortConflict => "PORT_CONFLICT",
            Self::DockerRunBuildFailed => "DOCKER_RUN_BUILD_FAILED",
            Self::DockerPullFailed => "DOCKER_PULL_FAILED",
            Self::DockerError => "DOCKER_ERROR",
            Self::DockerDaemonDown => "DOCKER_DAEMON_DOWN",
            Self::BackupFailed => "BACKUP_FAILED",
            Self::BackupTimeout => "BACKUP_TIMEOUT",
            Self::HealthcheckFailed => "HEALTHCHECK_FAILED",
            Self::VersionMismatch => "VERSION_MISMATCH",
            Self::MigrationTimeout => "MIGRATION_TIMEOUT",
            Self::MigrationFailed => "MIGRATION_FAILED",
            Self::ConcurrencyBlocked => "CONCURRENCY_BLOCKED",
            Self::DiskSpaceLow => "DISK_SPACE_LOW",
            Self::InvalidDbConfig => "INVALID_DB_CONFIG",
            Self::PayramContainerNotFound => "PAYRAM_CONTAINER_NOT_FOUND",
            Self::PayramCorePortNotFound => "PAYRAM_CORE_PORT_NOT_FOUND",
            Self::SupervisorctlFailed => "SUPERVISORCTL_FAILED",
            Self::BackupFailedAfterQuiesce => "BACKUP_FAILED_AFTER_QUIESCE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse from the stored string form; unrecognized codes degrade to `Unknown`
    /// rather than erroring, so a persisted job from an older build still loads.
    pub fn parse(code: &str) -> Self {
        match code {
            "POLICY_FETCH_FAILED" => Self::PolicyFetchFailed,
            "MANIFEST_FETCH_FAILED" => Self::ManifestFetchFailed,
            "MANUAL_UPGRADE_REQUIRED" => Self::ManualUpgradeRequired,
            "CONTAINER_NAME_UNRESOLVED" => Self::ContainerNameUnresolved,
            "CONTAINER_NOT_FOUND" => Self::ContainerNotFound,
            "RUNTIME_INSPECTION_FAILED" => Self::RuntimeInspectionFailed,
            "PORT_CONFLICT" => Self::PortConflict,
            "DOCKER_RUN_BUILD_FAILED" => Self::DockerRunBuildFailed,
            "DOCKER_PULL_FAILED" => Self::DockerPullFailed,
            "DOCKER_ERROR" => Self::DockerError,
            "DOCKER_DAEMON_DOWN" => Self::DockerDaemonDown,
            "BACKUP_FAILED" => Self::BackupFailed,
            "BACKUP_TIMEOUT" => Self::BackupTimeout,
            "HEALTHCHECK_FAILED" => Self::HealthcheckFailed,
            "VERSION_MISMATCH" => Self::VersionMismatch,
            "MIGRATION_TIMEOUT" => Self::MigrationTimeout,
            "MIGRATION_FAILED" => Self::MigrationFailed,
            "CONCURRENCY_BLOCKED" => Self::ConcurrencyBlocked,
            "DISK_SPACE_LOW" => Self::DiskSpaceLow,
            "INVALID_DB_CONFIG" => Self::InvalidDbConfig,
            "PAYRAM_CONTAINER_NOT_FOUND" => Self::PayramContainerNotFound,
            "PAYRAM_CORE_PORT_NOT_FOUND" => Self::PayramCorePortNotFound,
            "SUPERVISORCTL_FAILED" => Self::SupervisorctlFailed,
            "BACKUP_FAILED_AFTER_QUIESCE" => Self::BackupFailedAfterQuiesce,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[path = "failure_tests.rs"]
mod tests;
