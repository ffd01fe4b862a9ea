#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for dump invocation.
pub const TRACING_TARGET_DUMP: &str = "dumpvault_core::dump";

/// Tracing target for pipeline stages.
pub const TRACING_TARGET_PIPELINE: &str = "dumpvault_core::pipeline";

/// Tracing target for notification delivery.
pub const TRACING_TARGET_NOTIFY: &str = "dumpvault_core::notify";

mod config;
mod context;
mod error;
mod policy;

pub mod dump;
pub mod notify;
pub mod pipeline;
pub mod storage;

#[cfg(test)]
mod testing;

pub use config::{BackupConfig, LINK_EXPIRY};
pub use context::RunContext;
pub use dump::{DumpError, DumpOutput, Dumper, MongoDump};
pub use error::{BackupError, Result};
pub use notify::Notifier;
pub use pipeline::{BackupPipeline, BackupReport};
pub use policy::{FailurePolicy, Stage};
pub use storage::ObjectStorage;
