// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policy document (spec §3): authoritative version catalog fetched by C3.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub version: String,
    pub reason: String,
    pub docs: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub latest: String,
    pub releases: Vec<String>,
    #[serde(default)]
    pub breakpoints: Vec<Breakpoint>,
    #[serde(default)]
    pub updater_api_init_version: Option<String>,
}

impl Policy {
    pub fn breakpoint_for(&self, version: &str) -> Option<&Breakpoint> {
        self.breakpoints.iter().find(|b| b.version == version)
    }

    pub fn is_known_release(&self, version: &str) -> bool {
        self.releases.iter().any(|r| r == version)
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
