//! Construction of the backup pipeline from configuration.

use std::sync::Arc;

use anyhow::Context;
use dumpvault_core::{BackupPipeline, MongoDump, Notifier};
use dumpvault_object::S3Provider;
use dumpvault_webhook::reqwest::ReqwestClient;

use super::Cli;

/// Connects the storage and webhook clients and assembles the pipeline.
pub fn create_pipeline(cli: &Cli) -> anyhow::Result<BackupPipeline> {
    let storage = S3Provider::connect(&cli.s3).context("failed to create S3 client")?;
    let webhook =
        ReqwestClient::new(cli.notifier.http.clone()).context("failed to create webhook client")?;
    let dumper = MongoDump::new(&cli.backup.dump_command);

    Ok(BackupPipeline::new(
        cli.backup.clone(),
        Arc::new(dumper),
        Arc::new(storage.into_inner()),
        Notifier::new(Arc::new(webhook), cli.notifier.discord_url.clone()),
    ))
}
