#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::process;

use anyhow::Context;
use dumpvault_core::RunContext;

use crate::config::{Cli, create_pipeline};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "dumpvault_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "dumpvault_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "dumpvault_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "backup run finished"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "backup run failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Runs a single backup.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init()?;
    telemetry::init_tracing()?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting dumpvault"
    );
    cli.log();

    let ctx = RunContext::new(&cli.backup.temp_dir);
    let pipeline = create_pipeline(&cli)?;

    let report = pipeline.run(&ctx).await.context("backup failed")?;

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        archive_key = %report.archive.key,
        archive_size = report.archive.size,
        logs_uploaded = report.logs.is_some(),
        elapsed_secs = report.elapsed_secs,
        notified = report.notified,
        "backup stored"
    );

    Ok(())
}
