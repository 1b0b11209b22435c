// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn format_then_parse_round_trips() {
    let meta = BackupMeta {
        from_version: "1.8.0".into(),
        to_version: "1.9.0".into(),
        job_id: "job-42".into(),
    };
    let created_at = Utc.with_ymd_and_hms(2026, 7, 27, 12, 0, 0).unwrap();
    let filename = format_backup_filename(&meta, "dump", created_at);
    assert_eq!(filename, "backup-20260727-120000-1.8.0-to-1.9.0.dump");
    let parsed = parse_backup_filename(&filename).unwrap();

    assert_eq!(parsed.from_version, meta.from_version);
    assert_eq!(parsed.to_version, meta.to_version);
    assert_eq!(parsed.created_at, created_at);
    assert_eq!(parsed.extension, "dump");
}

#[test]
fn unrelated_filename_does_not_parse() {
    assert!(parse_backup_filename("README.md").is_none());
    assert!(parse_backup_filename("payram-app.log").is_none());
}

#[test]
fn truncated_filename_does_not_parse() {
    assert!(parse_backup_filename("backup-2026-to-.dump").is_none());
}
