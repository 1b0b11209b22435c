// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers shared by the container runtime and database
//! exec adapters.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout for a single container-tool invocation (spec §5).
pub const CONTAINER_TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for a database dump/restore subprocess (spec §5).
pub const DB_EXEC_TIMEOUT: Duration = Duration::from_secs(600);

/// Run a subprocess command with a timeout.
///
/// Wraps `Command::output()` with `tokio::time::timeout`, converting timeout
/// expiration into a descriptive error message. The child process is killed
/// automatically when the timeout elapses, via the tokio `Child` drop impl.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(format!("{description} failed: {io_err}")),
        Err(_elapsed) => Err(format!(
            "{description} timed out after {}s",
            timeout.as_secs()
        )),
    }
}

/// Combine stdout and stderr into one string for error messages (spec §4.C1:
/// "Errors bubble up with the combined stdout+stderr captured").
pub fn combined_output(output: &Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&stderr);
    }
    combined
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
