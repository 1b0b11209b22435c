// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pud backup create|list|restore` — manual backup management (spec §4.C9).

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Subcommand;

use crate::client::PudClient;

#[derive(Subcommand)]
pub enum BackupCommand {
    /// Take an immediate database backup of the running Target.
    Create,
    /// List backups known to the backup directory.
    List,
    /// Restore a backup file, optionally rolling the container back too.
    Restore {
        #[arg(long)]
        file: PathBuf,
        /// Skip the interactive confirmation prompt.
        #[arg(long)]
        yes: bool,
        /// Also roll the container back to the backup's source version.
        #[arg(long)]
        full_recovery: bool,
    },
}

pub async fn handle(client: &PudClient, cmd: BackupCommand) -> Result<i32> {
    match cmd {
        BackupCommand::Create => {
            let record = client.backup_create().await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(0)
        }
        BackupCommand::List => {
            let records = client.backup_list().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(0)
        }
        BackupCommand::Restore { file, yes, full_recovery } => {
            if !yes && !crate::confirm(&format!("Restore backup '{}'?", file.display())) {
                bail!("aborted: confirmation declined");
            }
            match client.backup_restore(file, full_recovery).await? {
                Some(resp) => {
                    println!("{}", serde_json::to_string_pretty(&resp)?);
                    Ok(0)
                }
                None => {
                    println!("backup restored but not found in the listing afterward");
                    Ok(0)
                }
            }
        }
    }
}
