// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-container database executor: pipes `[container-tool] exec` through a
//! host file (spec §4.C2).

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::subprocess::{combined_output, run_with_timeout, DB_EXEC_TIMEOUT};

use super::{DbConnection, DbExecAdapter, DbExecError, DumpFormat};

/// Invokes `pg_dump`/`pg_restore`/`psql` inside `container_name` via
/// `[container-tool] exec`, streaming to/from a host file.
pub struct InContainerDbExecutor {
    container_tool: String,
    container_name: String,
}

impl InContainerDbExecutor {
    pub fn new(container_tool: impl Into<String>, container_name: impl Into<String>) -> Self {
        Self {
            container_tool: container_tool.into(),
            container_name: container_name.into(),
        }
    }

    fn client_binary(&self, format: DumpFormat, restoring: bool) -> &'static str {
        match (format, restoring) {
            (DumpFormat::Custom, false) => "pg_dump",
            (DumpFormat::Custom, true) => "pg_restore",
            (DumpFormat::Plain, false) => "pg_dump",
            (DumpFormat::Plain, true) => "psql",
        }
    }
}

#[async_trait]
impl DbExecAdapter for InContainerDbExecutor {
    async fn dump(
        &self,
        conn: &DbConnection,
        format: DumpFormat,
        destination: &Path,
    ) -> Result<(), DbExecError> {
        let binary = self.client_binary(format, false);
        let mut args = vec![
            "exec".to_string(),
            "-i".to_string(),
            self.container_name.clone(),
            binary.to_string(),
            "-U".to_string(),
            conn.user.clone(),
            "-d".to_string(),
            conn.database.clone(),
        ];
        if format == DumpFormat::Custom {
            args.push("-Fc".to_string());
        }
        let mut cmd = Command::new(&self.container_tool);
        cmd.args(&args);
        cmd.env("PGPASSWORD", &conn.password);
        cmd.stdout(std::process::Stdio::piped());

        let output = run_with_timeout(cmd, DB_EXEC_TIMEOUT, "in-container dump")
            .await
            .map_err(DbExecError::DumpFailed)?;
        if !output.status.success() {
            return Err(DbExecError::DumpFailed(combined_output(&output)));
        }
        let mut file = File::create(destination)
            .await
            .map_err(|e| DbExecError::DumpFailed(e.to_string()))?;
        file.write_all(&output.stdout)
            .await
            .map_err(|e| DbExecError::DumpFailed(e.to_string()))?;
        Ok(())
    }

    async fn restore(
        &self,
        conn: &DbConnection,
        format: DumpFormat,
        source: &Path,
    ) -> Result<(), DbExecError> {
        let binary = self.client_binary(format, true);
        let args = vec![
            "exec".to_string(),
            "-i".to_string(),
            self.container_name.clone(),
            binary.to_string(),
            "-U".to_string(),
            conn.user.clone(),
            "-d".to_string(),
            conn.database.clone(),
        ];
        let input = tokio::fs::read(source)
            .await
            .map_err(|e| DbExecError::RestoreFailed(e.to_string()))?;

        let mut cmd = Command::new(&self.container_tool);
        cmd.args(&args);
        cmd.env("PGPASSWORD", &conn.password);
        cmd.stdin(std::process::Stdio::piped());
        let mut child = cmd
            .spawn()
            .map_err(|e| DbExecError::RestoreFailed(e.to_string()))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&input)
                .await
                .map_err(|e| DbExecError::RestoreFailed(e.to_string()))?;
        }
        let status = tokio::time::timeout(DB_EXEC_TIMEOUT, child.wait())
            .await
            .map_err(|_| DbExecError::Timeout)?
            .map_err(|e| DbExecError::RestoreFailed(e.to_string()))?;
        if !status.success() {
            return Err(DbExecError::RestoreFailed(format!(
                "restore exited with {status}"
            )));
        }
        Ok(())
    }
}
