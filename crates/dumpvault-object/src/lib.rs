#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for object store operations.
pub const TRACING_TARGET: &str = "dumpvault_object::client";

/// Tracing target for provider construction.
pub const TRACING_TARGET_PROVIDER: &str = "dumpvault_object::provider";

/// Content type used for binary archive objects.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type used for plain-text log objects.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

pub mod client;
pub mod providers;
pub mod types;

#[doc(hidden)]
pub mod prelude;

pub use crate::client::ObjectStoreClient;
pub use crate::providers::{S3Credentials, S3Provider};
pub use crate::types::{Error, Result, UploadInfo};
