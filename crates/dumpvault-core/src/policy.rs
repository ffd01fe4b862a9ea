//! Per-stage failure handling.

use strum::{AsRefStr, Display, IntoStaticStr};

/// A step of a backup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Dump,
    ArchiveUpload,
    LogsUpload,
    Cleanup,
    ArchiveLink,
    LogsLink,
    Notify,
}

/// What a failure in a given [`Stage`] triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailurePolicy {
    /// Post an error message to the webhook.
    pub notify: bool,
    /// Stop the run and exit non-zero.
    pub halt: bool,
}

impl FailurePolicy {
    const FATAL: Self = Self {
        notify: true,
        halt: true,
    };
    const TOLERATED: Self = Self {
        notify: false,
        halt: false,
    };
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 7] = [
        Stage::Dump,
        Stage::ArchiveUpload,
        Stage::LogsUpload,
        Stage::Cleanup,
        Stage::ArchiveLink,
        Stage::LogsLink,
        Stage::Notify,
    ];

    pub const fn failure_policy(self) -> FailurePolicy {
        match self {
            Self::Dump | Self::ArchiveUpload | Self::Cleanup | Self::ArchiveLink => {
                FailurePolicy::FATAL
            }
            Self::LogsUpload | Self::LogsLink | Self::Notify => FailurePolicy::TOLERATED,
        }
    }
}
