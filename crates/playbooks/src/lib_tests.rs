// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn every_known_failure_code_has_a_registered_playbook() {
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
        FailureCode::PayramContainerNotFound,
        FailureCode::PayramCorePortNotFound,
        FailureCode::SupervisorctlFailed,
        FailureCode::BackupFailedAfterQuiesce,
        FailureCode::Unknown,
    ];
    for code in codes {
        assert!(REGISTRY.contains_key(&code), "missing playbook for {code}");
    }
}

#[test]
fn unknown_code_degrades_to_the_generic_unknown_playbook() {
    let playbook = render_playbook(FailureCode::Unknown, &PlaybookContext::default()).unwrap();
    assert_eq!(playbook.code, "UNKNOWN");
    assert_eq!(playbook.data_risk, pud_core::DataRisk::Unknown);
}

#[test]
fn render_substitutes_container_name_into_message_and_steps() {
    let ctx = PlaybookContext {
        container_name: "payram-app".to_string(),
        ..Default::default()
    };
    let playbook = render_playbook(FailureCode::ContainerNotFound, &ctx).unwrap();
    assert!(playbook.user_message.contains("payram-app"));
}

#[test]
fn render_prefers_context_backup_path_over_template_default() {
    let ctx = PlaybookContext {
        container_name: "payram-app".to_string(),
        backup_path: "/var/backups/app-2026-07-27.dump".to_string(),
        ..Default::default()
    };
    let playbook = render_playbook(FailureCode::BackupTimeout, &ctx).unwrap();
    assert_eq!(
        playbook.backup_path.as_deref(),
        Some("/var/backups/app-2026-07-27.dump")
    );
    assert!(playbook.user_message.contains("payram-app"));
}

#[test]
fn classification_predicates_match_registry() {
    assert!(is_retryable(FailureCode::DockerPullFailed));
    assert!(!is_retryable(FailureCode::HealthcheckFailed));
    assert!(requires_manual_intervention(FailureCode::HealthcheckFailed));
    assert!(!requires_manual_intervention(FailureCode::DockerPullFailed));
    assert!(has_data_risk(FailureCode::BackupFailedAfterQuiesce));
    assert!(!has_data_risk(FailureCode::DockerPullFailed));
}
