//! S3-compatible provider using [`object_store::aws::AmazonS3Builder`].
//!
//! Works with AWS S3, MinIO, and any S3-compatible service.

#[cfg(feature = "config")]
use clap::Args;
use derive_more::Deref;
use object_store::aws::AmazonS3Builder;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_PROVIDER;
use crate::client::ObjectStoreClient;
use crate::types::{Error, Result};

/// Typed credentials for the S3-compatible provider.
#[derive(Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    /// S3 endpoint, either a bare `host[:port]` or a full URL.
    ///
    /// Bare hosts are contacted over HTTPS.
    #[cfg_attr(feature = "config", arg(long = "s3-endpoint", env = "S3_ENDPOINT"))]
    pub endpoint: String,

    /// Access key ID for static credentials.
    #[cfg_attr(feature = "config", arg(long = "s3-access-key", env = "S3_ID"))]
    pub access_key_id: String,

    /// Secret access key for static credentials.
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-secret-key", env = "S3_KEY", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub secret_access_key: String,

    /// Bucket the backups are written to.
    #[cfg_attr(feature = "config", arg(long = "s3-bucket", env = "S3_BUCKET"))]
    pub bucket: String,

    /// Region used for request signing.
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-region", env = "S3_REGION", default_value = "us-east-1")
    )]
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl S3Credentials {
    /// Creates credentials for `endpoint` and `bucket` in the default region.
    pub fn new(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            bucket: bucket.into(),
            region: default_region(),
        }
    }

    /// Sets the signing region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Endpoint as a URL, defaulting bare hosts to `https://`.
    pub fn endpoint_url(&self) -> String {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("https://{endpoint}")
        }
    }

    /// Returns a masked version of the access key for logging.
    pub fn access_key_masked(&self) -> String {
        let mut chars = self.access_key_id.chars();
        let prefix: String = chars.by_ref().take(4).collect();
        if chars.next().is_some() {
            format!("{prefix}***")
        } else {
            "***".to_string()
        }
    }
}

impl std::fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_masked())
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// S3-backed object storage client able to sign download URLs.
#[derive(Debug, Clone, Deref)]
pub struct S3Provider(ObjectStoreClient);

impl S3Provider {
    /// Identifier used in error labels.
    pub const ID: &'static str = "s3";

    /// Builds a client from static credentials.
    ///
    /// No request is sent; an unreachable endpoint only surfaces on the first
    /// upload.
    pub fn connect(creds: &S3Credentials) -> Result<Self> {
        let endpoint = creds.endpoint_url();

        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&creds.bucket)
            .with_region(&creds.region)
            .with_endpoint(&endpoint)
            .with_access_key_id(&creds.access_key_id)
            .with_secret_access_key(&creds.secret_access_key);

        if endpoint.starts_with("http://") {
            builder = builder.with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| Error::connection(&e, Self::ID).with_source(e))?;

        tracing::info!(
            target: TRACING_TARGET_PROVIDER,
            endpoint = %endpoint,
            bucket = %creds.bucket,
            region = %creds.region,
            access_key = %creds.access_key_masked(),
            "S3 client initialized"
        );

        Ok(Self(ObjectStoreClient::signing(store, &creds.bucket)))
    }

    /// Unwraps the underlying client.
    pub fn into_inner(self) -> ObjectStoreClient {
        self.0
    }
}
