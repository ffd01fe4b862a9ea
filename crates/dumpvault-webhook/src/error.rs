//! Kind-classified errors for webhook delivery.

use hipstr::HipStr;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Boxed error usable as a source across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias defaulting to the webhook [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while delivering a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The webhook URL or payload is unusable.
    InvalidInput,
    /// The HTTP client could not be built.
    Configuration,
    /// Connection or transport failure.
    NetworkError,
    /// The endpoint did not answer in time.
    Timeout,
    /// The endpoint answered with a non-2xx status.
    Rejected,
    /// The payload could not be encoded.
    Serialization,
    /// Unknown error occurred.
    #[default]
    Unknown,
}

/// Webhook error with a kind, an optional message, and an optional source.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// Classification of the failure.
    pub kind: ErrorKind,
    /// Human-readable detail.
    pub message: Option<HipStr<'static>>,
    /// Underlying cause.
    #[source]
    pub source: Option<BoxedError>,
    /// HTTP status returned by the endpoint, for [`ErrorKind::Rejected`].
    pub status_code: Option<u16>,
}

impl Error {
    /// Bare error of `kind`.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
            status_code: None,
        }
    }

    /// Error of `kind` caused by `source`.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self::new(kind).with_source(source)
    }

    /// Shorthand for [`ErrorKind::InvalidInput`].
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Shorthand for [`ErrorKind::Configuration`].
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Shorthand for [`ErrorKind::NetworkError`].
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Shorthand for [`ErrorKind::Timeout`].
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Shorthand for [`ErrorKind::Serialization`].
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// The endpoint answered with `status_code`.
    pub fn rejected(status_code: u16) -> Self {
        Self {
            status_code: Some(status_code),
            ..Self::new(ErrorKind::Rejected)
        }
        .with_message(format!("endpoint responded with status {status_code}"))
    }

    /// Replaces the message.
    pub fn with_message(mut self, message: impl Into<HipStr<'static>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Replaces the source.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::Serialization, error)
            .with_message("failed to encode webhook payload")
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let error = Error::network_error().with_message("connection refused");
        assert_eq!(error.to_string(), "[network_error]: connection refused");

        let bare = Error::new(ErrorKind::Unknown);
        assert_eq!(bare.to_string(), "[unknown]");
    }

    #[test]
    fn rejected_keeps_status() {
        let error = Error::rejected(404);
        assert_eq!(error.kind, ErrorKind::Rejected);
        assert_eq!(error.status_code, Some(404));
        assert!(error.to_string().contains("404"));
    }

    #[test]
    fn serde_errors_are_serialization() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::from(source);

        assert_eq!(error.kind, ErrorKind::Serialization);
        assert!(error.source.is_some());
    }

    #[test]
    fn transport_constructors_set_kind() {
        assert_eq!(Error::network_error().kind, ErrorKind::NetworkError);
        assert_eq!(Error::timeout().kind, ErrorKind::Timeout);
        assert_eq!(Error::timeout().status_code, None);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!(ErrorKind::from_str("timeout").unwrap(), ErrorKind::Timeout);
        assert_eq!(ErrorKind::from_str("rejected").unwrap(), ErrorKind::Rejected);
        assert!(ErrorKind::from_str("invalid").is_err());
    }
}
