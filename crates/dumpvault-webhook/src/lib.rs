#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod discord;
mod error;

pub mod request;
pub mod response;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use discord::{DiscordMessage, Embed, EmbedField, FIELD_VALUE_LIMIT};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use request::WebhookRequest;
pub use response::WebhookResponse;

/// Core trait for webhook delivery.
///
/// A delivered request that the endpoint answered with a non-2xx status is
/// still `Ok`; use [`WebhookResponse::error_for_status`] to reject it.
#[async_trait::async_trait]
pub trait WebhookProvider: Send + Sync {
    /// Posts the request payload to its endpoint.
    async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookResponse>;
}
