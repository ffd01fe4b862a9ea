//! Webhook delivery response.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Outcome of a webhook delivery that reached the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Request ID this response corresponds to.
    pub request_id: Uuid,
    /// HTTP status code from the webhook endpoint.
    pub status_code: u16,
    /// Timestamp when the request was initiated.
    pub started_at: Timestamp,
    /// Timestamp when the response was received.
    pub finished_at: Timestamp,
}

impl WebhookResponse {
    pub fn new(request_id: Uuid, status_code: u16, started_at: Timestamp) -> Self {
        Self {
            request_id,
            status_code,
            started_at,
            finished_at: Timestamp::now(),
        }
    }

    /// Returns whether the delivery was successful (2xx status code).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Round-trip time of the delivery.
    pub fn duration(&self) -> jiff::Span {
        self.started_at.until(self.finished_at).unwrap_or_default()
    }

    /// Turns a non-2xx response into an [`ErrorKind::Rejected`] error.
    ///
    /// [`ErrorKind::Rejected`]: crate::ErrorKind::Rejected
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::rejected(self.status_code))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn no_content_is_success() {
        let request_id = Uuid::now_v7();
        let response = WebhookResponse::new(request_id, 204, Timestamp::now());

        assert!(response.is_success());
        assert_eq!(response.request_id, request_id);
        assert!(response.error_for_status().is_ok());
    }

    #[test]
    fn client_errors_are_rejected() {
        for status in [400, 401, 404, 429, 500] {
            let response = WebhookResponse::new(Uuid::now_v7(), status, Timestamp::now());
            let error = response.error_for_status().unwrap_err();

            assert_eq!(error.kind, ErrorKind::Rejected);
            assert_eq!(error.status_code, Some(status));
        }
    }
}
