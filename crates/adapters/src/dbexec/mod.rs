// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database Exec Adapter (spec §4.C2): runs dump/restore either inside the
//! Target container or against an external host, selected once at discovery
//! time and carried as a tagged variant — the "dynamic dispatch → tagged
//! variant" design note in spec §9.

mod discover;
mod external;
mod in_container;

pub use discover::{discover_db_location, DbDiscoveryError};
pub use external::ExternalDbExecutor;
pub use in_container::InContainerDbExecutor;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbExecError {
    #[error("dump failed: {0}")]
    DumpFailed(String),
    #[error("restore failed: {0}")]
    RestoreFailed(String),
    #[error("operation timed out")]
    Timeout,
    #[error("external executor cannot run against an in-container database")]
    WrongMode,
}

/// Dump format; custom is preferred (spec §4.C9: "pick `dump` (custom) format
/// when possible, else `sql`").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Custom,
    Plain,
}

impl DumpFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DumpFormat::Custom => "dump",
            DumpFormat::Plain => "sql",
        }
    }
}

/// Connection details resolved by `discover_db_location` (spec §4.C2 precedence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConnection {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

/// Where the database lives; chosen once during discovery, then every
/// downstream call pattern-matches on this instead of re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    InContainer { container_name: String },
    External,
}

impl DbLocation {
    /// In-container iff host is a loopback address (spec §4.C2).
    pub fn classify(host: &str, container_name: &str) -> Self {
        match host {
            "localhost" | "127.0.0.1" | "::1" => DbLocation::InContainer {
                container_name: container_name.to_string(),
            },
            _ => DbLocation::External,
        }
    }
}

#[async_trait]
pub trait DbExecAdapter: Send + Sync + 'static {
    async fn dump(
        &self,
        conn: &DbConnection,
        format: DumpFormat,
        destination: &Path,
    ) -> Result<(), DbExecError>;

    async fn restore(
        &self,
        conn: &DbConnection,
        format: DumpFormat,
        source: &Path,
    ) -> Result<(), DbExecError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
