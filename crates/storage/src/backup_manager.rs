// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backup Manager (spec §4.C9): pre-upgrade database dumps, listing,
//! pruning, integrity verification, and restore.

use crate::backup_filename::{format_backup_filename, parse_backup_filename};
use chrono::Utc;
use pud_adapters::{DbConnection, DbExecAdapter, DbExecError, DumpFormat};
use pud_core::{BackupMeta, BackupRecord};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CUSTOM_FORMAT_MAGIC: &[u8] = b"PGDMP";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database dump/restore failed: {0}")]
    DbExec(#[from] DbExecError),
    #[error("DISK_SPACE_LOW: only {available} bytes free, need at least {required}")]
    DiskSpaceLow { available: u64, required: u64 },
    #[error("backup file failed verification: {0}")]
    VerificationFailed(String),
    #[error("{0} is not a backup file produced by this manager")]
    NotABackupFile(PathBuf),
}

/// Takes a pre-upgrade backup into `backup_dir`, refusing if there isn't at
/// least `min_free_bytes` of headroom (spec §4.C9 / `DISK_SPACE_LOW`).
pub async fn create_backup(
    adapter: &dyn DbExecAdapter,
    conn: &DbConnection,
    meta: &BackupMeta,
    backup_dir: &Path,
    format: DumpFormat,
    min_free_bytes: u64,
) -> Result<BackupRecord, BackupError> {
    fs::create_dir_all(backup_dir)?;

    let available = fs2::available_space(backup_dir)?;
    if available < min_free_bytes {
        return Err(BackupError::DiskSpaceLow {
            available,
            required: min_free_bytes,
        });
    }

    let created_at = Utc::now();
    let filename = format_backup_filename(meta, format.extension(), created_at);
    let path = backup_dir.join(&filename);

    adapter.dump(conn, format, &path).await?;

    let size = fs::metadata(&path)?.len();
    Ok(BackupRecord {
        path: path.to_string_lossy().into_owned(),
        size,
        created_at,
        from_version: meta.from_version.clone(),
        to_version: meta.to_version.clone(),
    })
}

/// Lists every backup this manager produced in `backup_dir`, newest first.
/// Files that don't match the naming convention (spec §3) are skipped.
pub fn list_backups(backup_dir: &Path) -> Result<Vec<BackupRecord>, BackupError> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for entry in fs::read_dir(backup_dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(filename) = path.file_name().and_then(|f| f.to_str()) else {
            continue;
        };
        let Some(parsed) = parse_backup_filename(filename) else {
            continue;
        };
        let size = fs::metadata(&path)?.len();
        records.push(BackupRecord {
            path: path.to_string_lossy().into_owned(),
            size,
            created_at: parsed.created_at,
            from_version: parsed.from_version,
            to_version: parsed.to_version,
        });
    }

    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(records)
}

/// Deletes all but the `keep` most recent backups, returning the deleted paths.
pub fn prune_backups(backup_dir: &Path, keep: usize) -> Result<Vec<PathBuf>, BackupError> {
    let records = list_backups(backup_dir)?;
    let mut removed = Vec::new();
    for record in records.into_iter().skip(keep) {
        let path = PathBuf::from(&record.path);
        fs::remove_file(&path)?;
        removed.push(path);
    }
    Ok(removed)
}

/// Sanity-checks a backup file before restore: exists, non-empty, and (for
/// the custom format) carries the `pg_dump` custom-format magic bytes.
pub fn verify_backup_file(path: &Path) -> Result<(), BackupError> {
    let filename = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| BackupError::NotABackupFile(path.to_path_buf()))?;
    let parsed = parse_backup_filename(filename).ok_or_else(|| BackupError::NotABackupFile(path.to_path_buf()))?;

    let metadata = fs::metadata(path)?;
    if metadata.len() == 0 {
        return Err(BackupError::VerificationFailed("file is empty".to_string()));
    }

    if parsed.extension == DumpFormat::Custom.extension() {
        let bytes = fs::read(path)?;
        if !bytes.starts_with(CUSTOM_FORMAT_MAGIC) {
            return Err(BackupError::VerificationFailed(
                "missing pg_dump custom-format header".to_string(),
            ));
        }
    }

    Ok(())
}

/// Verifies then restores `path` into `conn` (spec §4.C9).
pub async fn restore_backup(
    adapter: &dyn DbExecAdapter,
    conn: &DbConnection,
    path: &Path,
    format: DumpFormat,
) -> Result<(), BackupError> {
    verify_backup_file(path)?;
    adapter.restore(conn, format, path).await?;
    Ok(())
}

#[cfg(test)]
#[path = "backup_manager_tests.rs"]
mod tests;
