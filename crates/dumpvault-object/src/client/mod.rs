//! Object-store client backed by [`object_store::ObjectStore`].
//!
//! [`ObjectStoreClient`] is a thin, cloneable wrapper around
//! `Arc<dyn ObjectStore>` plus an optional [`Signer`] for issuing pre-signed
//! URLs. Every public method is instrumented with [`tracing`].

use std::path::Path as LocalPath;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::Method;
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{
    Attribute, Attributes, ObjectMeta, ObjectStore, PutMultipartOpts, PutOptions, PutPayload,
    WriteMultipart,
};
use tokio::io::AsyncReadExt;
use url::Url;

use crate::TRACING_TARGET;
use crate::types::error::from_object_store;
use crate::types::{Error, Result, UploadInfo};

/// Size of the buffer used when streaming a local file into a multipart upload.
const READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Maximum number of multipart chunks in flight at once.
const MAX_CONCURRENT_PARTS: usize = 4;

/// Cloneable handle to an [`ObjectStore`] backend bound to a single bucket.
///
/// All methods accept human-readable string keys and convert them to
/// [`object_store::path::Path`] internally.
#[derive(Clone, Debug)]
pub struct ObjectStoreClient {
    store: Arc<dyn ObjectStore>,
    signer: Option<Arc<dyn Signer>>,
    bucket: String,
}

impl ObjectStoreClient {
    /// Wrap a concrete [`ObjectStore`] implementation that cannot sign URLs.
    pub fn new(store: impl ObjectStore, bucket: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            signer: None,
            bucket: bucket.into(),
        }
    }

    /// Wrap a store that also implements [`Signer`] (e.g. `AmazonS3`).
    pub fn signing<S>(store: S, bucket: impl Into<String>) -> Self
    where
        S: ObjectStore + Signer,
    {
        let store = Arc::new(store);
        Self {
            store: store.clone(),
            signer: Some(store as Arc<dyn Signer>),
            bucket: bucket.into(),
        }
    }

    /// Use `signer` for pre-signed URLs instead of the current one.
    pub fn with_signer(mut self, signer: impl Signer) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    /// Name of the bucket this client writes to.
    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Stream the local file at `path` to `key` as a multipart upload.
    ///
    /// The file is read in fixed-size chunks so large archives are never held
    /// in memory. A failed read aborts the pending upload.
    #[tracing::instrument(
        name = "object.put_file",
        skip(self),
        target = TRACING_TARGET,
        fields(bucket = %self.bucket, path = %path.display(), size)
    )]
    pub async fn put_file(
        &self,
        key: &str,
        path: &LocalPath,
        content_type: Option<&str>,
    ) -> Result<UploadInfo> {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| Error::local_file(path, e))?;

        let location = Path::from(key);
        let opts = PutMultipartOpts {
            attributes: content_attributes(content_type),
            ..Default::default()
        };
        let upload = self
            .store
            .put_multipart_opts(&location, opts)
            .await
            .map_err(from_object_store)?;
        let mut writer = WriteMultipart::new(upload);

        let size = match copy_file(&mut file, &mut writer, path).await {
            Ok(size) => size,
            Err(err) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        key,
                        error = %abort_err,
                        "failed to abort multipart upload"
                    );
                }
                return Err(err);
            }
        };

        let result = writer.finish().await.map_err(from_object_store)?;
        tracing::Span::current().record("size", size);

        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %self.bucket,
            key,
            size,
            "file uploaded"
        );

        Ok(UploadInfo::from_put_result(
            &self.bucket,
            key,
            size,
            content_type,
            result,
        ))
    }

    /// Upload `data` to `key`, optionally setting the content-type.
    #[tracing::instrument(
        name = "object.put",
        skip(self, data),
        target = TRACING_TARGET,
        fields(bucket = %self.bucket, size = data.len())
    )]
    pub async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<UploadInfo> {
        let location = Path::from(key);
        let size = data.len() as u64;
        let opts = PutOptions {
            attributes: content_attributes(content_type),
            ..Default::default()
        };

        let result = self
            .store
            .put_opts(&location, PutPayload::from(data), opts)
            .await
            .map_err(from_object_store)?;

        Ok(UploadInfo::from_put_result(
            &self.bucket,
            key,
            size,
            content_type,
            result,
        ))
    }

    /// Issue a pre-signed `GET` URL for `key`, valid for `expires_in`.
    ///
    /// Signing happens locally from the configured credentials; the object is
    /// not checked for existence.
    #[tracing::instrument(
        name = "object.presign_get",
        skip(self),
        target = TRACING_TARGET,
        fields(bucket = %self.bucket, expires_in_secs = expires_in.as_secs())
    )]
    pub async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<Url> {
        let Some(signer) = &self.signer else {
            return Err(Error::runtime(
                "backend does not support pre-signed URLs",
                "object-store",
            ));
        };

        let location = Path::from(key);
        signer
            .signed_url(Method::GET, &location, expires_in)
            .await
            .map_err(from_object_store)
    }

    /// Get object metadata without downloading the body.
    #[tracing::instrument(name = "object.head", skip(self), target = TRACING_TARGET)]
    pub async fn head(&self, key: &str) -> Result<ObjectMeta> {
        let location = Path::from(key);
        self.store.head(&location).await.map_err(from_object_store)
    }

    /// Retrieve the raw bytes stored at `key`.
    #[tracing::instrument(name = "object.get", skip(self), target = TRACING_TARGET)]
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        let location = Path::from(key);
        let result = self.store.get(&location).await.map_err(from_object_store)?;
        result.bytes().await.map_err(from_object_store)
    }
}

fn content_attributes(content_type: Option<&str>) -> Attributes {
    let mut attributes = Attributes::new();
    if let Some(ct) = content_type {
        attributes.insert(Attribute::ContentType, ct.to_string().into());
    }
    attributes
}

/// Copy `file` into `writer`, returning the number of bytes read.
async fn copy_file(
    file: &mut tokio::fs::File,
    writer: &mut WriteMultipart,
    path: &LocalPath,
) -> Result<u64> {
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let read = file
            .read(&mut buffer)
            .await
            .map_err(|e| Error::local_file(path, e))?;
        if read == 0 {
            break;
        }

        writer
            .wait_for_capacity(MAX_CONCURRENT_PARTS)
            .await
            .map_err(from_object_store)?;
        writer.write(&buffer[..read]);
        total += read as u64;
    }

    Ok(total)
}
