//! Reqwest-based HTTP client for webhook delivery.
//!
//! This module provides a reqwest-based implementation of the [`WebhookProvider`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use dumpvault_webhook::reqwest::{ReqwestClient, ReqwestConfig};
//!
//! let client = ReqwestClient::new(ReqwestConfig::default().with_timeout(10))?;
//! ```
//!
//! [`WebhookProvider`]: crate::WebhookProvider

mod client;
mod config;
mod error;

pub use client::ReqwestClient;
pub use config::{DEFAULT_TIMEOUT_SECS, ReqwestConfig};
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "dumpvault_webhook::reqwest";
