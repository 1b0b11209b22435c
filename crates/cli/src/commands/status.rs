// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pud status` / `pud logs` — read the last (or running) upgrade job.

use std::time::Duration;

use anyhow::Result;

use crate::client::{job_is_failure, PudClient};

#[derive(clap::Args)]
pub struct LogsArgs {
    /// Keep polling and print new log lines as they appear.
    #[arg(short, long)]
    pub follow: bool,
}

const LOGS_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub async fn status(client: &PudClient) -> Result<i32> {
    match client.status().await? {
        Some(resp) => {
            println!("{}", serde_json::to_string_pretty(&resp)?);
            Ok(if job_is_failure(&resp.job) { 1 } else { 0 })
        }
        None => {
            println!("no upgrade job recorded yet");
            Ok(0)
        }
    }
}

pub async fn logs(client: &PudClient, args: LogsArgs) -> Result<i32> {
    if !args.follow {
        print!("{}", client.logs().await?);
        return exit_code_for_last_job(client).await;
    }

    let mut seen = String::new();
    loop {
        let current = client.logs().await?;
        if let Some(new_part) = current.strip_prefix(seen.as_str()) {
            print!("{new_part}");
        } else {
            print!("{current}");
            seen.clear();
        }
        seen = current;

        if let Some(resp) = client.status().await? {
            if resp.job.state.is_terminal() {
                return exit_code_for_last_job(client).await;
            }
        }
        tokio::time::sleep(LOGS_POLL_INTERVAL).await;
    }
}

async fn exit_code_for_last_job(client: &PudClient) -> Result<i32> {
    match client.status().await? {
        Some(resp) => Ok(if job_is_failure(&resp.job) { 1 } else { 0 }),
        None => Ok(0),
    }
}
