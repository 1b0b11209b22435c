// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External-host database executor: invokes the host's own client binaries
//! (spec §4.C2). Refuses to run when the connection classifies as in-container.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use crate::subprocess::{combined_output, run_with_timeout, DB_EXEC_TIMEOUT};

use super::{DbConnection, DbExecAdapter, DbExecError, DbLocation, DumpFormat};

pub struct ExternalDbExecutor;

impl ExternalDbExecutor {
    fn check_mode(conn: &DbConnection, container_name: &str) -> Result<(), DbExecError> {
        if matches!(
            DbLocation::classify(&conn.host, container_name),
            DbLocation::InContainer { .. }
        ) {
            return Err(DbExecError::WrongMode);
        }
        Ok(())
    }

    fn connection_args(conn: &DbConnection) -> Vec<String> {
        vec![
            "-h".to_string(),
            conn.host.clone(),
            "-p".to_string(),
            conn.port.clone(),
            "-U".to_string(),
            conn.user.clone(),
            "-d".to_string(),
            conn.database.clone(),
        ]
    }
}

#[async_trait]
impl DbExecAdapter for ExternalDbExecutor {
    async fn dump(
        &self,
        conn: &DbConnection,
        format: DumpFormat,
        destination: &Path,
    ) -> Result<(), DbExecError> {
        Self::check_mode(conn, "")?;
        let mut args = Self::connection_args(conn);
        args.push("-f".to_string());
        args.push(destination.display().to_string());
        if format == DumpFormat::Custom {
            args.push("-Fc".to_string());
        }
        let mut cmd = Command::new("pg_dump");
        cmd.args(&args);
        cmd.env("PGPASSWORD", &conn.password);
        let output = run_with_timeout(cmd, DB_EXEC_TIMEOUT, "external dump")
            .await
            .map_err(DbExecError::DumpFailed)?;
        if !output.status.success() {
            return Err(DbExecError::DumpFailed(combined_output(&output)));
        }
        Ok(())
    }

    async fn restore(
        &self,
        conn: &DbConnection,
        format: DumpFormat,
        source: &Path,
    ) -> Result<(), DbExecError> {
        Self::check_mode(conn, "")?;
        let binary = match format {
            DumpFormat::Custom => "pg_restore",
            DumpFormat::Plain => "psql",
        };
        let mut args = Self::connection_args(conn);
        match format {
            DumpFormat::Custom => args.push(source.display().to_string()),
            DumpFormat::Plain => {
                args.push("-f".to_string());
                args.push(source.display().to_string());
            }
        }
        let mut cmd = Command::new(binary);
        cmd.args(&args);
        cmd.env("PGPASSWORD", &conn.password);
        let output = run_with_timeout(cmd, DB_EXEC_TIMEOUT, "external restore")
            .await
            .map_err(DbExecError::RestoreFailed)?;
        if !output.status.success() {
            return Err(DbExecError::RestoreFailed(combined_output(&output)));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "external_tests.rs"]
mod tests;
