// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job persistence (spec §4.C8): one JSON file per job, written atomically
//! (write-temp, fsync, rename) so a crash mid-write never corrupts the
//! latest-known state, plus a JSONL append-only log per job.

use chrono::Utc;
use parking_lot::Mutex;
use pud_core::{Job, JobId};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum JobStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn job_path(jobs_dir: &Path, id: &JobId) -> PathBuf {
    jobs_dir.join(format!("{}.json", id.as_str()))
}

/// Corrupt job files are moved aside rather than propagated as a hard error,
/// mirroring the snapshot recovery behavior the rest of the daemon relies on.
fn rotate_bak_path(path: &Path) -> PathBuf {
    path.with_extension("json.bak")
}

/// Persists `Job` documents under `<state_dir>/jobs/` and per-job JSONL logs
/// under `<state_dir>/logs/`. Appends are serialized through an in-process
/// mutex; the daemon holds the only writer for a given state dir.
pub struct JobStore {
    jobs_dir: PathBuf,
    logs_dir: PathBuf,
    append_lock: Mutex<()>,
}

impl JobStore {
    pub fn open(state_dir: &Path) -> Result<Self, JobStoreError> {
        let jobs_dir = state_dir.join("jobs");
        let logs_dir = state_dir.join("logs");
        fs::create_dir_all(&jobs_dir)?;
        fs::create_dir_all(&logs_dir)?;
        Ok(Self {
            jobs_dir,
            logs_dir,
            append_lock: Mutex::new(()),
        })
    }

    /// Write `job` atomically: to `<id>.json.tmp`, fsync, then rename over
    /// the final path (spec §4.C8).
    pub fn save(&self, job: &Job) -> Result<(), JobStoreError> {
        let path = job_path(&self.jobs_dir, &job.id);
        let tmp_path = path.with_extension("json.tmp");

        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, job)?;
            writer.flush()?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Loads the job with the most recent `updated_at` across every
    /// persisted job file, so the daemon can resume the in-flight job (if
    /// any) across a restart. Corrupt files are rotated to `.bak` and skipped.
    pub fn load_latest(&self) -> Result<Option<Job>, JobStoreError> {
        let mut latest: Option<Job> = None;

        for entry in fs::read_dir(&self.jobs_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::load_file(&path) {
                Ok(job) => {
                    if latest.as_ref().map(|j| job.updated_at > j.updated_at).unwrap_or(true) {
                        latest = Some(job);
                    }
                }
                Err(e) => {
                    let bak = rotate_bak_path(&path);
                    warn!(error = %e, path = %path.display(), bak = %bak.display(), "corrupt job file, rotating to .bak");
                    fs::rename(&path, &bak)?;
                }
            }
        }

        Ok(latest)
    }

    /// Loads a specific job by id, if its file exists.
    pub fn load(&self, id: &JobId) -> Result<Option<Job>, JobStoreError> {
        let path = job_path(&self.jobs_dir, id);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_file(&path).map(Some)
    }

    /// Loads every persisted job, newest first, for the jobs history view.
    pub fn load_all(&self) -> Result<Vec<Job>, JobStoreError> {
        let mut jobs = HashMap::new();
        for entry in fs::read_dir(&self.jobs_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Ok(job) = Self::load_file(&path) {
                jobs.insert(job.id.as_str().to_string(), job);
            }
        }
        let mut jobs: Vec<Job> = jobs.into_values().collect();
        jobs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(jobs)
    }

    fn load_file(path: &Path) -> Result<Job, JobStoreError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    fn log_path(&self, id: &JobId) -> PathBuf {
        self.logs_dir.join(format!("{}.jsonl", id.as_str()))
    }

    /// Appends a single JSONL line `{"ts":...,"line":"..."}` to the job's
    /// log, holding `append_lock` for the duration of the write.
    pub fn append_log(&self, id: &JobId, line: &str) -> Result<(), JobStoreError> {
        let _guard = self.append_lock.lock();
        let record = serde_json::json!({ "ts": Utc::now(), "line": line });
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path(id))?;
        writeln!(file, "{}", serde_json::to_string(&record)?)?;
        Ok(())
    }

    /// Reads back every log line recorded for `id`, in append order.
    pub fn read_log(&self, id: &JobId) -> Result<Vec<String>, JobStoreError> {
        let path = self.log_path(id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        let mut lines = Vec::new();
        for raw in content.lines() {
            let value: serde_json::Value = serde_json::from_str(raw)?;
            if let Some(line) = value.get("line").and_then(|v| v.as_str()) {
                lines.push(line.to_string());
            }
        }
        Ok(lines)
    }
}

#[cfg(test)]
#[path = "job_store_tests.rs"]
mod tests;
