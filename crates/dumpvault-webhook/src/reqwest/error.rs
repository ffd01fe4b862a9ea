//! Transport errors raised by [`ReqwestClient`](super::ReqwestClient).

use thiserror::Error;

/// Result alias for transport errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure while encoding or sending a request.
#[derive(Debug, Error)]
pub enum Error {
    /// Sending the request failed.
    #[error("webhook request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Encoding the body failed.
    #[error("failed to encode webhook body: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) if e.is_builder() => crate::Error::invalid_input()
                .with_message(e.to_string())
                .with_source(e),
            Error::Reqwest(e) if e.is_timeout() => crate::Error::timeout()
                .with_message(e.to_string())
                .with_source(e),
            Error::Reqwest(e) if e.is_connect() => crate::Error::network_error()
                .with_message("connection failed")
                .with_source(e),
            Error::Reqwest(e) => crate::Error::network_error()
                .with_message(e.to_string())
                .with_source(e),
            Error::Serde(e) => crate::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
        }
    }
}
