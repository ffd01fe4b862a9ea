//! Webhook delivery request.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::Result;

/// A JSON webhook delivery request.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// The webhook endpoint URL.
    pub url: Url,
    /// JSON body posted to the endpoint.
    pub payload: serde_json::Value,
    /// Custom headers to include in the request.
    pub headers: HashMap<String, String>,
    /// Optional request timeout (uses client default if not set).
    pub timeout: Option<Duration>,
}

impl WebhookRequest {
    /// Creates a request posting `payload` to `url`.
    pub fn new(url: Url, payload: serde_json::Value) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            url,
            payload,
            headers: HashMap::new(),
            timeout: None,
        }
    }

    /// Creates a request from any serializable body.
    pub fn json(url: Url, body: &impl Serialize) -> Result<Self> {
        Ok(Self::new(url, serde_json::to_value(body)?))
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a custom header to the request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}
