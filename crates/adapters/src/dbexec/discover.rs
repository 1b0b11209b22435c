// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DB connection discovery (spec §4.C2): env overrides, then the running
//! container's own env, then a persisted env file under the state directory.

use std::path::Path;
use thiserror::Error;

use super::DbConnection;

#[derive(Debug, Error)]
pub enum DbDiscoveryError {
    #[error("no database configuration found in env, container, or persisted file")]
    NotFound,
}

/// A local host value means this override is just ambient noise in the
/// daemon's own process env, not a deliberate pointer at an external
/// database -- source 1 is only authoritative for a non-local host (spec
/// §4.C2), matching the loopback literals `DbLocation::classify` treats as
/// in-container.
fn is_local_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

/// Source 1: explicit environment overrides (`POSTGRES_HOST`, ...). Skipped
/// when the host is local, so it falls through to the container's own env.
fn from_env_overrides(get: &dyn Fn(&str) -> Option<String>) -> Option<DbConnection> {
    let host = get("POSTGRES_HOST")?;
    if is_local_host(&host) {
        return None;
    }
    Some(DbConnection {
        host,
        port: get("POSTGRES_PORT").unwrap_or_else(|| "5432".to_string()),
        user: get("POSTGRES_USER").unwrap_or_else(|| "postgres".to_string()),
        password: get("POSTGRES_PASSWORD").unwrap_or_default(),
        database: get("POSTGRES_DB").unwrap_or_else(|| "postgres".to_string()),
    })
}

/// Source 2: env entries captured from the running container's inspection
/// (spec §3 `RuntimeState::env`, `"KEY=VALUE"` strings).
fn from_container_env(env: &[String]) -> Option<DbConnection> {
    let lookup = |key: &str| -> Option<String> {
        env.iter().find_map(|entry| {
            let (k, v) = entry.split_once('=')?;
            (k == key).then(|| v.to_string())
        })
    };
    let host = lookup("POSTGRES_HOST").or_else(|| Some("localhost".to_string()))?;
    Some(DbConnection {
        host,
        port: lookup("POSTGRES_PORT").unwrap_or_else(|| "5432".to_string()),
        user: lookup("POSTGRES_USER").unwrap_or_else(|| "postgres".to_string()),
        password: lookup("POSTGRES_PASSWORD").unwrap_or_default(),
        database: lookup("POSTGRES_DB").unwrap_or_else(|| "postgres".to_string()),
    })
}

/// Source 3: the persisted `state/db.env` key=value file (spec §6).
fn parse_env_file(contents: &str) -> Option<DbConnection> {
    let mut host = None;
    let mut port = "5432".to_string();
    let mut user = "postgres".to_string();
    let mut password = String::new();
    let mut database = "postgres".to_string();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key {
            "POSTGRES_HOST" => host = Some(value.to_string()),
            "POSTGRES_PORT" => port = value.to_string(),
            "POSTGRES_USER" => user = value.to_string(),
            "POSTGRES_PASSWORD" => password = value.to_string(),
            "POSTGRES_DB" => database = value.to_string(),
            _ => {}
        }
    }
    Some(DbConnection {
        host: host?,
        port,
        user,
        password,
        database,
    })
}

/// Resolve a `DbConnection` using the spec §4.C2 precedence: explicit env
/// overrides, then the inspected container's env, then the persisted file.
pub async fn discover_db_location(
    get_env: &dyn Fn(&str) -> Option<String>,
    container_env: &[String],
    env_file_path: &Path,
) -> Result<DbConnection, DbDiscoveryError> {
    if let Some(conn) = from_env_overrides(get_env) {
        return Ok(conn);
    }
    if let Some(conn) = from_container_env(container_env) {
        return Ok(conn);
    }
    if let Ok(contents) = tokio::fs::read_to_string(env_file_path).await {
        if let Some(conn) = parse_env_file(&contents) {
            return Ok(conn);
        }
    }
    Err(DbDiscoveryError::NotFound)
}

#[cfg(test)]
#[path = "discover_tests.rs"]
mod tests;
