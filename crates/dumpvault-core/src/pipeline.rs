//! Sequential backup pipeline.
//!
//! Stages run strictly one after another. A failure is routed through
//! [`Stage::failure_policy`]: fatal stages post an error notification and end
//! the run with a [`BackupError`], tolerated stages are logged and skipped.

use std::sync::Arc;

use bytes::Bytes;
use dumpvault_object::{ARCHIVE_CONTENT_TYPE, TEXT_CONTENT_TYPE, UploadInfo};
use jiff::Zoned;
use url::Url;

use crate::TRACING_TARGET_PIPELINE;
use crate::config::{BackupConfig, LINK_EXPIRY};
use crate::context::RunContext;
use crate::dump::Dumper;
use crate::error::{BackupError, Result};
use crate::notify::{Notifier, SuccessSummary, error_message, success_message};
use crate::policy::Stage;
use crate::storage::ObjectStorage;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct BackupReport {
    pub archive: UploadInfo,
    /// `None` when the logs upload failed.
    pub logs: Option<UploadInfo>,
    pub archive_url: Url,
    pub logs_url: Option<Url>,
    pub elapsed_secs: i64,
    /// Whether the webhook accepted the success message.
    pub notified: bool,
}

/// Dump, upload, clean up, sign, and notify.
pub struct BackupPipeline {
    config: BackupConfig,
    dumper: Arc<dyn Dumper>,
    storage: Arc<dyn ObjectStorage>,
    notifier: Notifier,
}

impl std::fmt::Debug for BackupPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupPipeline")
            .field("config", &self.config)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl BackupPipeline {
    pub fn new(
        config: BackupConfig,
        dumper: Arc<dyn Dumper>,
        storage: Arc<dyn ObjectStorage>,
        notifier: Notifier,
    ) -> Self {
        Self {
            config,
            dumper,
            storage,
            notifier,
        }
    }

    /// Executes one backup run.
    ///
    /// On a fatal failure the error notification has already been attempted
    /// when this returns.
    #[tracing::instrument(
        name = "backup.run",
        skip_all,
        target = TRACING_TARGET_PIPELINE,
        fields(archive_key = ctx.archive_key())
    )]
    pub async fn run(&self, ctx: &RunContext) -> Result<BackupReport> {
        match self.execute(ctx).await {
            Ok(report) => Ok(report),
            Err(err) => Err(self.escalate(err).await),
        }
    }

    async fn execute(&self, ctx: &RunContext) -> Result<BackupReport> {
        let dump = self
            .dumper
            .dump(&self.config.mongo_uri, ctx.archive_path())
            .await?;

        let archive = self
            .storage
            .put_file(
                ctx.archive_key(),
                ctx.archive_path(),
                Some(ARCHIVE_CONTENT_TYPE),
            )
            .await
            .map_err(BackupError::ArchiveUpload)?;

        tracing::info!(
            target: TRACING_TARGET_PIPELINE,
            key = %archive.key,
            size = archive.size,
            "archive uploaded"
        );

        let logs = match self
            .storage
            .put(
                ctx.logs_key(),
                Bytes::from(dump.output),
                Some(TEXT_CONTENT_TYPE),
            )
            .await
        {
            Ok(info) => Some(info),
            Err(err) => {
                tolerate(Stage::LogsUpload, &err);
                None
            }
        };

        tokio::fs::remove_file(ctx.archive_path())
            .await
            .map_err(|source| BackupError::Cleanup {
                path: ctx.archive_path().to_path_buf(),
                source,
            })?;

        let archive_url = self
            .storage
            .presign_get(ctx.archive_key(), LINK_EXPIRY)
            .await
            .map_err(BackupError::ArchiveLink)?;

        let logs_url = match logs {
            Some(_) => match self.storage.presign_get(ctx.logs_key(), LINK_EXPIRY).await {
                Ok(url) => Some(url),
                Err(err) => {
                    tolerate(Stage::LogsLink, &err);
                    None
                }
            },
            None => None,
        };

        let completed_at = Zoned::now();
        let elapsed_secs = ctx.elapsed_secs(&completed_at);
        let message = success_message(&SuccessSummary {
            completed_at: &completed_at,
            elapsed_secs,
            retention: &self.config.retention,
            archive: &archive,
            archive_url: &archive_url,
            logs_url: logs_url.as_ref(),
        });
        let notified = self.notifier.send(&message).await;

        tracing::info!(
            target: TRACING_TARGET_PIPELINE,
            elapsed_secs,
            notified,
            "backup completed"
        );

        Ok(BackupReport {
            archive,
            logs,
            archive_url,
            logs_url,
            elapsed_secs,
            notified,
        })
    }

    async fn escalate(&self, err: BackupError) -> BackupError {
        let stage = err.stage();
        tracing::error!(
            target: TRACING_TARGET_PIPELINE,
            stage = %stage,
            error = %err,
            "backup failed"
        );

        if stage.failure_policy().notify {
            let message = error_message(&Zoned::now(), &err.details());
            self.notifier.send(&message).await;
        }

        err
    }
}

fn tolerate(stage: Stage, err: &dumpvault_object::Error) {
    debug_assert!(!stage.failure_policy().halt);
    tracing::warn!(
        target: TRACING_TARGET_PIPELINE,
        stage = %stage,
        error = %err,
        "stage failed, continuing"
    );
}
