// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: the container tool, the database client
//! binaries, and the Manifest/Policy/Target HTTP endpoints.

pub mod container;
pub mod dbexec;
pub mod http_clients;
pub mod subprocess;

pub use container::{ContainerError, ContainerListEntry, ContainerRuntimeAdapter, RealContainerAdapter};
pub use dbexec::{
    discover_db_location, DbConnection, DbDiscoveryError, DbExecAdapter, DbExecError, DbLocation,
    DumpFormat, ExternalDbExecutor, InContainerDbExecutor,
};
pub use http_clients::{
    fetch_json_document, DocumentFetchError, HealthResponse, MigrationsResponse, MigrationsState,
    TargetClient, TargetClientError, VersionResponse,
};

#[cfg(any(test, feature = "test-support"))]
pub use container::{ContainerCall, FakeContainerAdapter};
