// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payram Updater Daemon (pudd)
//!
//! Background process that owns the upgrade engine and serves the loopback
//! HTTP control plane (spec §6).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod handlers;
mod router;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use config::Config;
use pud_engine::RecoveryAction;
use pud_storage::JobStore;
use state::AppState;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("pudd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("pudd {}", env!("CARGO_PKG_VERSION"));
                println!("Payram Updater Daemon - owns the upgrade engine and HTTP control plane");
                println!();
                println!("USAGE:");
                println!("    pudd");
                println!();
                println!("pudd is typically started by the `pud` CLI and should not be invoked");
                println!("directly. It serves a loopback-only HTTP control plane consumed by `pud`.");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: pudd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    std::fs::create_dir_all(&config.state_dir)?;

    let log_guard = setup_logging(&config)?;
    info!("starting pudd");

    let job_store = JobStore::open(&config.state_dir)?;

    match pud_engine::classify_last_job(&job_store) {
        Ok(RecoveryAction::Noop) => info!("no in-flight job to recover"),
        Ok(RecoveryAction::RetryJob { requested_target }) => {
            warn!(target = %requested_target, "last job failed with a retryable code; awaiting a fresh /upgrade/run");
        }
        Ok(RecoveryAction::AwaitOperator { code }) => {
            warn!(code = %code, "last job failed with a manual-intervention code; see recovery playbook");
        }
        Ok(RecoveryAction::OrphanedJob) => {
            warn!("daemon restarted mid-upgrade; last job left in a non-terminal state");
        }
        Err(e) => error!(error = %e, "failed to inspect last job at startup"),
    }

    let port = config.port;
    let state: state::SharedState = Arc::new(AppState::new(config, job_store)?);
    let app = router::router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "pudd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("pudd stopped");
    drop(log_guard);
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to install SIGTERM handler");
            return;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to install SIGINT handler");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }
}

fn setup_logging(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().unwrap_or_else(|| std::path::Path::new(".")),
        config.log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("daemon.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
