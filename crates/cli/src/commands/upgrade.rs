// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pud dry-run` / `pud run` — drive the upgrade engine's `/upgrade/plan`
//! and `/upgrade/run` endpoints (spec §6).

use std::time::Duration;

use anyhow::{bail, Result};
use clap::ValueEnum;

use crate::client::PudClient;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliMode {
    Dashboard,
    Manual,
}

impl From<CliMode> for pud_core::Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Dashboard => pud_core::Mode::Dashboard,
            CliMode::Manual => pud_core::Mode::Manual,
        }
    }
}

#[derive(clap::Args)]
pub struct DryRunArgs {
    #[arg(long, value_enum, default_value = "dashboard")]
    pub mode: CliMode,
    #[arg(long = "to", default_value = "latest")]
    pub target: String,
}

/// Returns the process exit code.
pub async fn dry_run(client: &PudClient, args: DryRunArgs) -> Result<i32> {
    let plan = client.plan(args.mode.into(), &args.target).await?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(if plan.state == "OK" { 0 } else { 1 })
}

#[derive(clap::Args)]
pub struct RunArgs {
    #[arg(long, value_enum, default_value = "dashboard")]
    pub mode: CliMode,
    #[arg(long = "to", default_value = "latest")]
    pub target: String,
    /// Skip the interactive confirmation prompt.
    #[arg(long)]
    pub yes: bool,
}

const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub async fn run(client: &PudClient, args: RunArgs) -> Result<i32> {
    if !args.yes && !crate::confirm(&format!("Upgrade to '{}' now?", args.target)) {
        bail!("aborted: confirmation declined");
    }

    let accepted = client.run(args.mode.into(), &args.target).await?;
    println!("started job {}", accepted.job_id);

    loop {
        if let Some(status) = client.status().await? {
            if status.job.id.as_str() == accepted.job_id {
                if status.job.state.is_terminal() {
                    println!("{}", serde_json::to_string_pretty(&status)?);
                    return Ok(if status.job.state == pud_core::JobState::Ready { 0 } else { 1 });
                }
                println!("... {}", status.job.state);
            }
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
