//! Restart-mid-upgrade: a daemon that starts up and finds a non-terminal job
//! already on disk (left behind by a prior process that was killed mid-run)
//! seeds its concurrency gate as blocked, rather than accepting a new run as
//! if nothing were in progress.

use std::path::Path;

use crate::prelude::{free_port, pudd_cmd, seed_job, wait_for};
use pud_core::{Clock, Job, JobId, JobState, Mode, SystemClock};

fn seed_executing_job(state_dir: &Path) {
    let now = SystemClock.now();
    let mut job = Job::new(
        JobId::new("restart-test-job"),
        Mode::Dashboard,
        "2.5.0".to_string(),
        "payram/payram".to_string(),
        "payram-app".to_string(),
        now,
    );
    job.transition(JobState::Executing, now).expect("fresh job transitions cleanly");
    seed_job(state_dir, &job);
}

#[tokio::test]
async fn run_after_restart_with_stale_executing_job_is_blocked() {
    let state_dir = tempfile::tempdir().expect("temp state dir");
    seed_executing_job(state_dir.path());

    let port = free_port();
    let mut child = pudd_cmd()
        .env("PUD_STATE_DIR", state_dir.path())
        .env("PUD_PORT", port.to_string())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .expect("pudd should spawn");

    let ready = wait_for(5_000, || std::net::TcpStream::connect(("127.0.0.1", port)).is_ok());
    assert!(ready, "pudd did not start listening in time");

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{port}/upgrade/run"))
        .json(&serde_json::json!({ "mode": "dashboard", "requested_target": "2.5.0" }))
        .send()
        .await
        .expect("run request should reach the restarted daemon");

    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    let payload: serde_json::Value = response.json().await.expect("conflict body should be JSON");
    assert_eq!(payload.get("error").and_then(|v| v.as_str()), Some("CONCURRENCY_BLOCKED"));
    assert_eq!(payload.get("state").and_then(|v| v.as_str()), Some("executing"));

    let _ = child.kill();
    let _ = child.wait();
}
