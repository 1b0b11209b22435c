// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Playbook data model (spec §3/§4.C7). The static registry and rendering
//! logic live in the `pud-playbooks` crate; this module only defines the shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Severity {
    Info,
    Retryable,
    ManualRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DataRisk {
    None,
    Possible,
    Likely,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playbook {
    pub code: String,
    pub severity: Severity,
    pub data_risk: DataRisk,
    pub title: String,
    pub user_message: String,
    pub ssh_steps: Vec<String>,
    #[serde(default)]
    pub docs_url: Option<String>,
    #[serde(default)]
    pub backup_path: Option<String>,
}

/// Values substituted into a playbook's placeholders at render time.
/// Empty fields leave the corresponding placeholder untouched.
#[derive(Debug, Clone, Default)]
pub struct PlaybookContext {
    pub container_name: String,
    pub base_url: String,
    pub http_port: String,
    pub db_port: String,
    pub image_repo: String,
    pub backup_path: String,
}
