//! Fatal backup failures.

use std::path::PathBuf;

use crate::dump::DumpError;
use crate::policy::Stage;

/// Type alias for Results with [`BackupError`].
pub type Result<T, E = BackupError> = std::result::Result<T, E>;

/// A failure that ended a backup run.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("database dump failed: {0}")]
    Dump(#[from] DumpError),

    #[error("archive upload failed: {0}")]
    ArchiveUpload(#[source] dumpvault_object::Error),

    #[error("failed to remove local archive {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to sign archive download link: {0}")]
    ArchiveLink(#[source] dumpvault_object::Error),
}

impl BackupError {
    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Dump(_) => Stage::Dump,
            Self::ArchiveUpload(_) => Stage::ArchiveUpload,
            Self::Cleanup { .. } => Stage::Cleanup,
            Self::ArchiveLink(_) => Stage::ArchiveLink,
        }
    }

    /// Text shown in the error notification.
    ///
    /// Dump failures include the captured tool output ahead of the error.
    pub fn details(&self) -> String {
        match self {
            Self::Dump(err) => err.report(),
            other => other.to_string(),
        }
    }
}
