//! Breakpoint-blocked upgrade: a policy breakpoint on the requested target
//! fails the job with `MANUAL_UPGRADE_REQUIRED` before anything touches the
//! container runtime, rather than applying the upgrade.

use std::path::Path;

use crate::prelude::spawn_daemon;

fn write_fixture(dir: &Path, name: &str, body: &serde_json::Value) -> String {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec(body).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

async fn poll_terminal_job(base_url: &str) -> serde_json::Value {
    let client = reqwest::Client::new();
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/upgrade/status")).send().await {
            if resp.status().is_success() {
                let body: serde_json::Value = resp.json().await.unwrap();
                if matches!(body.get("state").and_then(|s| s.as_str()), Some("ready" | "failed")) {
                    return body;
                }
            }
        }
        assert!(std::time::Instant::now() < deadline, "job never reached a terminal state");
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn breakpoint_blocks_dashboard_mode_upgrade() {
    let fixtures = tempfile::tempdir().unwrap();
    let policy = write_fixture(
        fixtures.path(),
        "policy.json",
        &serde_json::json!({
            "latest": "2.5.0",
            "releases": ["2.4.0", "2.5.0"],
            "breakpoints": [{
                "version": "2.5.0",
                "reason": "requires a manual data migration",
                "docs": "https://example.invalid/breakpoints/2.5.0",
            }],
        }),
    );
    let manifest = write_fixture(fixtures.path(), "manifest.json", &serde_json::json!({}));

    let daemon = spawn_daemon(&[("PUD_POLICY_URL", &policy), ("PUD_MANIFEST_URL", &manifest)]);

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/upgrade/run", daemon.base_url()))
        .json(&serde_json::json!({ "mode": "dashboard", "requested_target": "2.5.0" }))
        .send()
        .await
        .expect("run request should be accepted");
    assert!(response.status().is_success(), "run should be accepted, not rejected outright");

    let job = poll_terminal_job(&daemon.base_url()).await;
    if job.get("state").and_then(|s| s.as_str()) != Some("failed") {
        eprintln!("=== DAEMON LOG ===\n{}\n=== END LOG ===", daemon.daemon_log());
    }
    assert_eq!(job.get("state").and_then(|s| s.as_str()), Some("failed"));
    assert_eq!(job.get("failure_code").and_then(|s| s.as_str()), Some("MANUAL_UPGRADE_REQUIRED"));
}
