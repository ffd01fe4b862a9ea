//! Webhook notification configuration.

use clap::Args;
use dumpvault_webhook::reqwest::ReqwestConfig;
use url::Url;

/// Where backup reports are posted and how.
#[derive(Clone, Args)]
pub struct NotifierConfig {
    /// Discord webhook URL
    #[arg(long = "discord-url", env = "DISCORD_URL", hide_env_values = true)]
    pub discord_url: Url,

    /// HTTP client settings for webhook delivery.
    #[clap(flatten)]
    pub http: ReqwestConfig,
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("discord_host", &self.discord_url.host_str())
            .field("http", &self.http)
            .finish()
    }
}
