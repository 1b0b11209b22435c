//! Concurrency-blocked upgrade: a second `/upgrade/run` while one is already
//! in flight is rejected with `409 Conflict` rather than queued or ignored.

use crate::prelude::spawn_daemon;

/// Binds a listener and never accepts on it, so a request to it blocks until
/// the client's own timeout — good enough to pin a daemon in `PolicyFetching`
/// for the life of a test.
fn hung_endpoint() -> (std::net::TcpListener, String) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind hung endpoint");
    let port = listener.local_addr().expect("local addr").port();
    (listener, format!("http://127.0.0.1:{port}/policy.json"))
}

#[tokio::test]
async fn second_run_while_first_in_flight_is_rejected() {
    let (_hung_listener, policy_url) = hung_endpoint();
    let daemon = spawn_daemon(&[("PUD_POLICY_URL", &policy_url)]);

    let client = reqwest::Client::new();
    let body = serde_json::json!({ "mode": "dashboard", "requested_target": "2.5.0" });

    let first = client
        .post(format!("{}/upgrade/run", daemon.base_url()))
        .json(&body)
        .send()
        .await
        .expect("first run request should reach the daemon");
    assert!(first.status().is_success(), "first run should be accepted while nothing else is in flight");

    let second = client
        .post(format!("{}/upgrade/run", daemon.base_url()))
        .json(&body)
        .send()
        .await
        .expect("second run request should reach the daemon");
    assert_eq!(second.status(), reqwest::StatusCode::CONFLICT);

    let payload: serde_json::Value = second.json().await.expect("conflict body should be JSON");
    assert_eq!(payload.get("error").and_then(|v| v.as_str()), Some("CONCURRENCY_BLOCKED"));
}
