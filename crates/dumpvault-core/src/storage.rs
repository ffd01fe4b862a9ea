//! Object storage seam used by the pipeline.

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use dumpvault_object::{ObjectStoreClient, Result, UploadInfo};
use url::Url;

/// Storage operations a backup run needs.
///
/// Implemented for [`ObjectStoreClient`]; tests substitute fakes that fail on
/// demand.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Streams a local file to `key`.
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<UploadInfo>;

    /// Uploads an in-memory body to `key`.
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<UploadInfo>;

    /// Issues a pre-signed download URL for `key`.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<Url>;
}

#[async_trait::async_trait]
impl ObjectStorage for ObjectStoreClient {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<UploadInfo> {
        ObjectStoreClient::put_file(self, key, path, content_type).await
    }

    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<UploadInfo> {
        ObjectStoreClient::put(self, key, data, content_type).await
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<Url> {
        ObjectStoreClient::presign_get(self, key, expires_in).await
    }
}
