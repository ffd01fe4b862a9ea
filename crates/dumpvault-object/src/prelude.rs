//! Convenience re-exports.

pub use crate::client::ObjectStoreClient;
pub use crate::providers::{S3Credentials, S3Provider};
pub use crate::types::{Error, UploadInfo};
pub use crate::{ARCHIVE_CONTENT_TYPE, TEXT_CONTENT_TYPE};
