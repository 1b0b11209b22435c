// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn round_trips_every_known_code() {
    let codes = [
        FailureCode::PolicyFetchFailed,
        FailureCode::ManifestFetchFailed,
        FailureCode::ManualUpgradeRequired,
        FailureCode::ContainerNameUnresolved,
        FailureCode::ContainerNotFound,
        FailureCode::RuntimeInspectionFailed,
        FailureCode::PortConflict,
        FailureCode::DockerRunBuildFailed,
        FailureCode::DockerPullFailed,
        FailureCode::DockerError,
        FailureCode::DockerDaemonDown,
        FailureCode::BackupFailed,
        FailureCode::BackupTimeout,
        FailureCode::HealthcheckFailed,
        FailureCode::VersionMismatch,
        FailureCode::MigrationTimeout,
        FailureCode::MigrationFailed,
        FailureCode::ConcurrencyBlocked,
        FailureCode::DiskSpaceLow,
        FailureCode::InvalidDbConfig,
    ];
    for code in codes {
        assert_eq!(FailureCode::parse(code.as_str()), code);
    }
}

#[test]
fn unknown_code_degrades_gracefully() {
    assert_eq!(FailureCode::parse("SOMETHING_NEW"), FailureCode::Unknown);
}
