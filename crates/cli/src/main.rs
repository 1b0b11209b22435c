// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pud - Payup Upgrade Daemon CLI

mod client;
mod commands;
mod daemon_process;

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};

use client::PudClient;
use commands::backup::BackupCommand;
use commands::status::LogsArgs;
use commands::upgrade::{DryRunArgs, RunArgs};

#[derive(Parser)]
#[command(name = "pud", version, about = "Control plane CLI for pudd, the Payup upgrade daemon")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pudd in the foreground.
    Serve,
    /// Show the last (or currently running) upgrade job.
    Status,
    /// Print the log for the last (or currently running) upgrade job.
    Logs(LogsArgs),
    /// Resolve a target and report whether an upgrade would succeed, without applying it.
    DryRun(DryRunArgs),
    /// Run an upgrade.
    Run(RunArgs),
    /// Run the read-only diagnostic sweep.
    Inspect,
    /// Apply the automated recovery action for the last failed job.
    Recover,
    /// Record an externally-upgraded running version as the last known good target.
    Sync,
    /// Backup management.
    #[command(subcommand)]
    Backup(BackupCommand),
}

fn base_url() -> String {
    let port = std::env::var("PUD_PORT").ok().and_then(|v| v.parse::<u16>().ok()).unwrap_or(2380);
    format!("http://127.0.0.1:{port}")
}

/// Prompts on stdin for a yes/no confirmation. Anything but `y`/`yes` (case
/// insensitive) is a decline.
pub fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Serve = cli.command {
        let status = daemon_process::run_foreground()?;
        std::process::exit(status.code().unwrap_or(1));
    }

    let client = PudClient::new(base_url());

    let exit_code = match cli.command {
        Commands::Serve => unreachable!("handled above"),
        Commands::Status => commands::status::status(&client).await?,
        Commands::Logs(args) => commands::status::logs(&client, args).await?,
        Commands::DryRun(args) => commands::upgrade::dry_run(&client, args).await?,
        Commands::Run(args) => commands::upgrade::run(&client, args).await?,
        Commands::Inspect => commands::diagnostics::inspect(&client).await?,
        Commands::Recover => commands::diagnostics::recover(&client).await?,
        Commands::Sync => commands::diagnostics::sync(&client).await?,
        Commands::Backup(cmd) => commands::backup::handle(&client, cmd).await?,
    };

    std::process::exit(exit_code);
}
