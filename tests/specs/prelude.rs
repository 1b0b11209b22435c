//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolves a compiled workspace binary, tolerating a stale
/// `CARGO_MANIFEST_DIR` by falling back to the test binary's own directory.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

pub fn pud_binary() -> PathBuf {
    binary_path("pud")
}

pub fn pudd_binary() -> PathBuf {
    binary_path("pudd")
}

pub fn pud_cmd() -> Command {
    Command::new(pud_binary())
}

pub fn pudd_cmd() -> Command {
    Command::new(pudd_binary())
}

/// An unused loopback port, so a CLI invocation never accidentally reaches
/// a real daemon on the default port during test runs.
pub fn unreachable_port() -> &'static str {
    "1"
}

/// Binds an ephemeral port and immediately releases it. Good enough for
/// single-threaded test runs where nothing else claims the port between the
/// bind and `pudd` starting up on it.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

/// Poll `condition` until it returns `true` or `timeout_ms` elapses.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
    false
}

/// A `pudd` process spawned against its own state directory and port, killed
/// when dropped.
pub struct DaemonHandle {
    child: std::process::Child,
    state_dir: tempfile::TempDir,
    port: u16,
}

impl DaemonHandle {
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn state_dir(&self) -> &Path {
        self.state_dir.path()
    }

    /// Reads back the daemon's log file, for dumping on assertion failure.
    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.state_dir.path().join("daemon.log"))
            .unwrap_or_else(|_| "(no daemon log)".to_string())
    }
}

impl Drop for DaemonHandle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawns `pudd` with a fresh `PUD_STATE_DIR` and an ephemeral `PUD_PORT`,
/// applying `envs` on top, and blocks until its HTTP control plane is
/// accepting connections.
pub fn spawn_daemon(envs: &[(&str, &str)]) -> DaemonHandle {
    let state_dir = tempfile::tempdir().expect("temp state dir");
    let port = free_port();

    let mut cmd = pudd_cmd();
    cmd.env("PUD_STATE_DIR", state_dir.path())
        .env("PUD_PORT", port.to_string())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null());
    for (key, value) in envs {
        cmd.env(key, value);
    }

    let child = cmd.spawn().expect("pudd should spawn");
    let handle = DaemonHandle { child, state_dir, port };

    let ready = wait_for(5_000, || std::net::TcpStream::connect(("127.0.0.1", handle.port)).is_ok());
    assert!(ready, "pudd did not start listening in time");
    handle
}

/// Seeds a job file directly under `state_dir/jobs/<id>.json`, as if a prior
/// daemon process had persisted it mid-upgrade before being killed.
pub fn seed_job(state_dir: &Path, job: &pud_core::Job) {
    let store = pud_storage::JobStore::open(state_dir).expect("open job store");
    store.save(job).expect("seed job");
}
