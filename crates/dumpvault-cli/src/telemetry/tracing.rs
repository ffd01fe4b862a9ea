//! Tracing initialization.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default directive when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "info";

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// ```bash
/// RUST_LOG=debug dumpvault
/// RUST_LOG=dumpvault_core=trace,dumpvault_object=debug dumpvault
/// ```
pub(super) fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(create_fmt_layer())
        .with(create_env_filter()?)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))
}

fn create_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVE))
        .map_err(|e| anyhow::anyhow!("failed to create env filter: {e}"))
}

fn create_fmt_layer() -> fmt::Layer<tracing_subscriber::Registry> {
    fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(true)
}
