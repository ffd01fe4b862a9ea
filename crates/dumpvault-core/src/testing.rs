//! In-process fakes for driving the pipeline in tests.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use dumpvault_object::{ObjectStoreClient, UploadInfo};
use dumpvault_webhook::{WebhookProvider, WebhookRequest, WebhookResponse};
use jiff::Timestamp;
use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use url::Url;

use crate::dump::{DumpError, DumpOutput, Dumper};
use crate::storage::ObjectStorage;

/// Webhook endpoint that records requests and answers with a fixed status.
pub(crate) struct RecordingWebhook {
    status: Option<u16>,
    requests: Mutex<Vec<WebhookRequest>>,
}

impl RecordingWebhook {
    pub fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
            requests: Mutex::default(),
        }
    }

    /// Fails every delivery with a network error.
    pub fn unreachable() -> Self {
        Self {
            status: None,
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<WebhookRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl WebhookProvider for RecordingWebhook {
    async fn deliver(&self, request: &WebhookRequest) -> dumpvault_webhook::Result<WebhookResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match self.status {
            Some(status) => Ok(WebhookResponse::new(request.request_id, status, Timestamp::now())),
            None => Err(dumpvault_webhook::Error::network_error().with_message("connection refused")),
        }
    }
}

/// Dumper that writes a zero-filled archive or fails with canned output.
pub(crate) struct FakeDumper {
    archive_size: usize,
    output: String,
    fail: bool,
}

impl FakeDumper {
    pub fn succeeding(archive_size: usize, output: &str) -> Self {
        Self {
            archive_size,
            output: output.to_string(),
            fail: false,
        }
    }

    pub fn failing(output: &str) -> Self {
        Self {
            archive_size: 0,
            output: output.to_string(),
            fail: true,
        }
    }
}

#[async_trait::async_trait]
impl Dumper for FakeDumper {
    async fn dump(&self, _uri: &str, archive: &Path) -> Result<DumpOutput, DumpError> {
        if self.fail {
            return Err(DumpError::Failed {
                program: "mongodump".to_string(),
                exit_code: Some(1),
                output: self.output.clone(),
            });
        }

        if let Some(dir) = archive.parent() {
            tokio::fs::create_dir_all(dir).await.unwrap();
        }
        tokio::fs::write(archive, vec![0u8; self.archive_size])
            .await
            .unwrap();

        Ok(DumpOutput {
            output: self.output.clone(),
            exit_code: Some(0),
        })
    }
}

/// A storage call observed by [`FlakyStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    PutFile(String),
    Put(String),
    Presign(String, Duration),
}

/// In-memory storage with an offline S3 signer and injectable failures.
pub(crate) struct FlakyStorage {
    pub inner: ObjectStoreClient,
    fail_put_file: bool,
    fail_put: bool,
    fail_presign: Option<String>,
    remove_source: bool,
    calls: Mutex<Vec<Call>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        let signer = AmazonS3Builder::new()
            .with_bucket_name("backups")
            .with_region("us-east-1")
            .with_endpoint("http://localhost:9000")
            .with_allow_http(true)
            .with_access_key_id("minioadmin")
            .with_secret_access_key("minioadmin")
            .build()
            .unwrap();

        Self {
            inner: ObjectStoreClient::new(InMemory::new(), "backups").with_signer(signer),
            fail_put_file: false,
            fail_put: false,
            fail_presign: None,
            remove_source: false,
            calls: Mutex::default(),
        }
    }

    pub fn failing_put_file(mut self) -> Self {
        self.fail_put_file = true;
        self
    }

    pub fn failing_put(mut self) -> Self {
        self.fail_put = true;
        self
    }

    pub fn failing_presign(mut self, key: &str) -> Self {
        self.fail_presign = Some(key.to_string());
        self
    }

    /// Deletes the local file after uploading it, so cleanup finds nothing.
    pub fn removing_source(mut self) -> Self {
        self.remove_source = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn injected() -> dumpvault_object::Error {
    dumpvault_object::Error::runtime("injected failure", "fake")
}

#[async_trait::async_trait]
impl ObjectStorage for FlakyStorage {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
    ) -> dumpvault_object::Result<UploadInfo> {
        self.record(Call::PutFile(key.to_string()));
        if self.fail_put_file {
            return Err(injected());
        }

        let info = self.inner.put_file(key, path, content_type).await?;
        if self.remove_source {
            tokio::fs::remove_file(path).await.unwrap();
        }
        Ok(info)
    }

    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> dumpvault_object::Result<UploadInfo> {
        self.record(Call::Put(key.to_string()));
        if self.fail_put {
            return Err(injected());
        }
        self.inner.put(key, data, content_type).await
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> dumpvault_object::Result<Url> {
        self.record(Call::Presign(key.to_string(), expires_in));
        if self.fail_presign.as_deref() == Some(key) {
            return Err(injected());
        }
        self.inner.presign_get(key, expires_in).await
    }
}
