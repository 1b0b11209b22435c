// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: env-driven, fixed paths under a resolved state
//! directory (spec.md §9 Open Question, resolved in `SPEC_FULL.md` §6).

use std::path::PathBuf;

use pud_adapters::DumpFormat;
use thiserror::Error;

/// Default loopback HTTP port (spec.md §9: deliberately neither of the
/// source's two conflicting defaults).
const DEFAULT_PORT: u16 = 2380;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory: $HOME is not set")]
    NoStateDir,
    #[error("PUD_PORT is not a valid port number: {0}")]
    InvalidPort(String),
}

/// Resolve state directory: `$PUD_STATE_DIR` > `$XDG_STATE_HOME/payup` >
/// `$HOME/.local/state/payup`.
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("PUD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("payup"));
    }
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/payup"))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub log_path: PathBuf,
    pub backup_dir: PathBuf,
    pub db_env_file: PathBuf,
    pub port: u16,
    pub policy_location: String,
    pub manifest_location: String,
    pub image_repo: String,
    pub container_tool_binary: String,
    pub container_name_override: Option<String>,
    pub min_free_backup_bytes: u64,
    pub dump_format: DumpFormat,
}

impl Config {
    /// Load configuration from the environment. Mirrors the teacher's
    /// `daemon::lifecycle::Config::load()`: one struct, one entry point,
    /// no builder.
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = state_dir()?;
        let port = match std::env::var("PUD_PORT") {
            Ok(v) => v.parse().map_err(|_| ConfigError::InvalidPort(v))?,
            Err(_) => DEFAULT_PORT,
        };
        let dump_format = match std::env::var("PUD_BACKUP_FORMAT").as_deref() {
            Ok("sql") | Ok("plain") => DumpFormat::Plain,
            _ => DumpFormat::Custom,
        };

        Ok(Self {
            log_path: state_dir.join("daemon.log"),
            backup_dir: std::env::var("PUD_BACKUP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| state_dir.join("backups")),
            db_env_file: state_dir.join("state").join("db.env"),
            port,
            policy_location: std::env::var("PUD_POLICY_URL")
                .unwrap_or_else(|_| "https://updates.payram.example/policy.json".to_string()),
            manifest_location: std::env::var("PUD_MANIFEST_URL")
                .unwrap_or_else(|_| "https://updates.payram.example/manifest.json".to_string()),
            image_repo: std::env::var("PUD_IMAGE_REPO").unwrap_or_else(|_| "payram/payram".to_string()),
            container_tool_binary: std::env::var("PUD_CONTAINER_TOOL").unwrap_or_else(|_| "docker".to_string()),
            container_name_override: std::env::var("PUD_CONTAINER_NAME").ok(),
            min_free_backup_bytes: std::env::var("PUD_MIN_FREE_BACKUP_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(200 * 1024 * 1024),
            dump_format,
            state_dir,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
