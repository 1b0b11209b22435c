// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backup metadata (spec §3/§4.C9).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input to `BackupManager::create_backup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMeta {
    pub from_version: String,
    pub to_version: String,
    pub job_id: String,
}

/// A backup file discovered by `list_backups`, with metadata parsed back out
/// of the filename convention (spec §3 / P7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub path: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub from_version: String,
    pub to_version: String,
}
