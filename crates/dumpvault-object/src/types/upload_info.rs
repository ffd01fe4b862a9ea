//! Descriptor returned by successful uploads.

use serde::{Deserialize, Serialize};

/// Metadata about an object that has just been written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadInfo {
    /// Bucket (or container) the object lives in.
    pub bucket: String,
    /// Object key within the bucket.
    pub key: String,
    /// Number of bytes written.
    pub size: u64,
    /// MIME content-type attached to the object, if any.
    pub content_type: Option<String>,
    /// Unique identifier for the newly created object, if the backend provides one.
    pub e_tag: Option<String>,
    /// A version indicator for the newly created object, if the backend provides one.
    pub version: Option<String>,
}

impl UploadInfo {
    pub(crate) fn from_put_result(
        bucket: &str,
        key: &str,
        size: u64,
        content_type: Option<&str>,
        result: object_store::PutResult,
    ) -> Self {
        Self {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            size,
            content_type: content_type.map(str::to_owned),
            e_tag: result.e_tag,
            version: result.version,
        }
    }

    /// Size of the object in whole kibibytes, rounded down.
    pub fn size_kib(&self) -> u64 {
        self.size / 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(size: u64) -> UploadInfo {
        UploadInfo {
            bucket: "backups".to_owned(),
            key: "dump.archive".to_owned(),
            size,
            content_type: None,
            e_tag: None,
            version: None,
        }
    }

    #[test]
    fn size_kib_rounds_down() {
        assert_eq!(info(10_485_760).size_kib(), 10_240);
        assert_eq!(info(2047).size_kib(), 1);
        assert_eq!(info(0).size_kib(), 0);
    }
}
