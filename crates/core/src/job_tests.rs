// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn job() -> Job {
    Job::new(
        JobId::new("job-1"),
        Mode::Dashboard,
        "latest".into(),
        "vendor/app".into(),
        "app".into(),
        Utc::now(),
    )
}

#[test]
fn transitions_normally() {
    let mut j = job();
    let t1 = Utc::now() + chrono::Duration::seconds(1);
    j.transition(JobState::PolicyFetching, t1).unwrap();
    assert_eq!(j.state, JobState::PolicyFetching);
    assert_eq!(j.updated_at, t1);
}

#[test]
fn terminal_state_never_regresses() {
    let mut j = job();
    let t1 = Utc::now() + chrono::Duration::seconds(1);
    j.transition(JobState::Ready, t1).unwrap();
    let t2 = t1 + chrono::Duration::seconds(1);
    let err = j.transition(JobState::Executing, t2).unwrap_err();
    assert_eq!(err.from, JobState::Ready);
    assert_eq!(j.state, JobState::Ready);
}

#[test]
fn fail_sets_code_and_message() {
    let mut j = job();
    let now = Utc::now();
    j.fail(crate::FailureCode::DockerPullFailed, "pull failed", now);
    assert_eq!(j.state, JobState::Failed);
    assert_eq!(j.failure_code, "DOCKER_PULL_FAILED");
    assert_eq!(j.message, "pull failed");
}
