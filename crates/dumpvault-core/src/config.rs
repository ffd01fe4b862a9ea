//! Backup run configuration.

use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Validity of the pre-signed download links: 7 days.
pub const LINK_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// What to dump, where to stage it, and how long it is kept.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct BackupConfig {
    /// MongoDB connection URI passed to the dump tool
    #[cfg_attr(
        feature = "config",
        arg(long = "mongo-uri", env = "MONGO_URI", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub mongo_uri: String,

    /// Retention period shown in notifications, in days
    #[cfg_attr(feature = "config", arg(long = "retention", env = "S3_RETENTION"))]
    pub retention: String,

    /// Dump executable
    #[cfg_attr(
        feature = "config",
        arg(long = "dump-command", env = "DUMP_COMMAND", default_value = "mongodump")
    )]
    #[serde(default = "default_dump_command")]
    pub dump_command: String,

    /// Directory the archive is written to before upload
    #[cfg_attr(
        feature = "config",
        arg(long = "temp-dir", env = "DUMP_TEMP_DIR", default_value = "temp")
    )]
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn default_dump_command() -> String {
    "mongodump".to_string()
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("temp")
}

impl BackupConfig {
    pub fn new(mongo_uri: impl Into<String>, retention: impl Into<String>) -> Self {
        Self {
            mongo_uri: mongo_uri.into(),
            retention: retention.into(),
            dump_command: default_dump_command(),
            temp_dir: default_temp_dir(),
        }
    }

    #[must_use]
    pub fn with_dump_command(mut self, dump_command: impl Into<String>) -> Self {
        self.dump_command = dump_command.into();
        self
    }

    #[must_use]
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }
}

impl std::fmt::Debug for BackupConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupConfig")
            .field("mongo_uri", &"<redacted>")
            .field("retention", &self.retention)
            .field("dump_command", &self.dump_command)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}
