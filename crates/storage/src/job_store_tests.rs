// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pud_core::{JobState, Mode};

fn job(id: &str, mode: Mode) -> Job {
    Job::new(
        JobId::new(id),
        mode,
        "1.9.0".into(),
        "vendor/app".into(),
        "app".into(),
        Utc::now(),
    )
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::open(dir.path()).unwrap();
    let j = job("job-1", Mode::Dashboard);
    store.save(&j).unwrap();
    let loaded = store.load(&j.id).unwrap().unwrap();
    assert_eq!(loaded.id, j.id);
    assert_eq!(loaded.state, JobState::Pending);
}

#[test]
fn load_latest_picks_most_recently_updated() {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::open(dir.path()).unwrap();

    let mut older = job("job-1", Mode::Dashboard);
    store.save(&older).unwrap();

    let mut newer = job("job-2", Mode::Manual);
    newer.updated_at = older.updated_at + chrono::Duration::seconds(10);
    store.save(&newer).unwrap();

    older.updated_at -= chrono::Duration::seconds(10);
    store.save(&older).unwrap();

    let latest = store.load_latest().unwrap().unwrap();
    assert_eq!(latest.id, newer.id);
}

#[test]
fn load_latest_is_none_when_store_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::open(dir.path()).unwrap();
    assert!(store.load_latest().unwrap().is_none());
}

#[test]
fn append_log_then_read_log_preserves_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::open(dir.path()).unwrap();
    let id = JobId::new("job-1");
    store.append_log(&id, "pulling image").unwrap();
    store.append_log(&id, "starting container").unwrap();
    let lines = store.read_log(&id).unwrap();
    assert_eq!(lines, vec!["pulling image", "starting container"]);
}

#[test]
fn read_log_of_unknown_job_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::open(dir.path()).unwrap();
    let lines = store.read_log(&JobId::new("missing")).unwrap();
    assert!(lines.is_empty());
}
