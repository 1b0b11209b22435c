// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backup filename convention (spec §3 / P7): encodes enough metadata in the
//! filename itself that `list_backups` can reconstruct a `BackupRecord`
//! without a separate sidecar index.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use pud_core::BackupMeta;

const PREFIX: &str = "backup-";
const DATE_FORMAT: &str = "%Y%m%d";
const TIME_FORMAT: &str = "%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBackupFilename {
    pub from_version: String,
    pub to_version: String,
    pub created_at: DateTime<Utc>,
    pub extension: String,
}

/// Builds the filename for a backup taken at `created_at`:
/// `backup-<YYYYMMDD>-<HHMMSS>-<fromVer>-to-<toVer>.<ext>`, e.g.
/// `backup-20260727-120000-1.8.0-to-1.9.0.dump`.
pub fn format_backup_filename(meta: &BackupMeta, extension: &str, created_at: DateTime<Utc>) -> String {
    format!(
        "{PREFIX}{}-{}-{}-to-{}.{extension}",
        created_at.format(DATE_FORMAT),
        created_at.format(TIME_FORMAT),
        meta.from_version,
        meta.to_version,
    )
}

/// Parses a filename produced by `format_backup_filename`. Returns `None`
/// for anything that doesn't match the convention, e.g. pre-existing files
/// in the backup directory (spec P7: round-trips format/parse only for
/// files this manager itself wrote).
pub fn parse_backup_filename(filename: &str) -> Option<ParsedBackupFilename> {
    let (stem, extension) = filename.rsplit_once('.')?;
    let rest = stem.strip_prefix(PREFIX)?;

    // `<YYYYMMDD>-<HHMMSS>-<fromVer>-to-<toVer>`: the date and time segments
    // are fixed-width, so split those off positionally before looking for
    // the `-to-` separator between the two version strings.
    if rest.len() < 16 {
        return None;
    }
    let (date, rest) = rest.split_at(8);
    let rest = rest.strip_prefix('-')?;
    let (time, rest) = rest.split_at(6);
    let rest = rest.strip_prefix('-')?;

    let naive = NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S").ok()?;
    let created_at = Utc.from_utc_datetime(&naive);

    let (from_version, to_version) = rest.split_once("-to-")?;
    if from_version.is_empty() || to_version.is_empty() {
        return None;
    }

    Some(ParsedBackupFilename {
        from_version: from_version.to_string(),
        to_version: to_version.to_string(),
        created_at,
        extension: extension.to_string(),
    })
}

#[cfg(test)]
#[path = "backup_filename_tests.rs"]
mod tests;
