//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── s3: S3Credentials         # Endpoint, keys, bucket, region
//! ├── backup: BackupConfig      # Mongo URI, retention, dump tool, temp dir
//! └── notifier: NotifierConfig  # Discord URL, HTTP timeout, user agent
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod notifier;
mod provider;

use std::process;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use dumpvault_core::BackupConfig;
use dumpvault_object::S3Credentials;
pub use notifier::NotifierConfig;
pub use provider::create_pipeline;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "dumpvault")]
#[command(about = "Dump a MongoDB database to S3 and report the result to Discord")]
#[command(version)]
pub struct Cli {
    /// Object storage credentials and bucket.
    #[clap(flatten)]
    pub s3: S3Credentials,

    /// Database dump settings.
    #[clap(flatten)]
    pub backup: BackupConfig,

    /// Webhook notification settings.
    #[clap(flatten)]
    pub notifier: NotifierConfig,
}

impl Cli {
    /// Loads the `.env` file (if enabled) and parses CLI arguments.
    ///
    /// `--help` and `--version` print and exit; any other parse failure,
    /// such as a missing required value, is returned.
    pub fn init() -> anyhow::Result<Self> {
        Self::load_dotenv();
        Self::try_parse()
            .or_else(|err| match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
                _ => Err(err),
            })
            .context("invalid configuration")
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs configuration without secrets.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            endpoint = %self.s3.endpoint_url(),
            bucket = %self.s3.bucket,
            region = %self.s3.region,
            access_key = %self.s3.access_key_masked(),
            "object storage configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            dump_command = %self.backup.dump_command,
            temp_dir = %self.backup.temp_dir.display(),
            retention_days = %self.backup.retention,
            webhook_host = self.notifier.discord_url.host_str().unwrap_or_default(),
            http_timeout_secs = self.notifier.http.timeout().as_secs(),
            "backup configuration"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
