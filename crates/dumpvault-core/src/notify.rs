//! Discord notification formatting and delivery.

use std::sync::Arc;

use dumpvault_object::UploadInfo;
use dumpvault_webhook::{
    DiscordMessage, Embed, EmbedField, WebhookProvider, WebhookRequest, WebhookResponse,
};
use jiff::Zoned;
use url::Url;

use crate::TRACING_TARGET_NOTIFY;
use crate::context::clock;
use crate::policy::Stage;

/// Embed color of success messages (green).
pub const SUCCESS_COLOR: u32 = 5_832_563;

/// Embed color of error messages (red).
pub const ERROR_COLOR: u32 = 16_734_296;

/// Field value shown when the logs could not be uploaded or linked.
const LOGS_UNAVAILABLE: &str = "Logs unavailable for this backup";

/// Facts reported by a success message.
#[derive(Debug, Clone, Copy)]
pub struct SuccessSummary<'a> {
    pub completed_at: &'a Zoned,
    pub elapsed_secs: i64,
    pub retention: &'a str,
    pub archive: &'a UploadInfo,
    pub archive_url: &'a Url,
    pub logs_url: Option<&'a Url>,
}

/// Builds the success embed.
pub fn success_message(summary: &SuccessSummary<'_>) -> DiscordMessage {
    let description = format!(
        "A new backup of the database has been performed today, at {}. \
         This backup has been sent to the S3 backup server.",
        clock(summary.completed_at)
    );

    let logs = summary.logs_url.map_or_else(
        || LOGS_UNAVAILABLE.to_string(),
        |url| format!("[Click to open the generated logs]({url})"),
    );

    let embed = Embed::new("New MongoDB backup", description, SUCCESS_COLOR)
        .with_field(EmbedField::inline(
            "⌛ Execution time",
            format!("{}s", summary.elapsed_secs),
        ))
        .with_field(EmbedField::inline(
            "✅ Retention period",
            format!("{} days", summary.retention),
        ))
        .with_field(EmbedField::inline(
            "📄 Backup size",
            format!("{} KB", summary.archive.size_kib()),
        ))
        .with_field(EmbedField::inline("📜 Backup logs", logs))
        .with_field(EmbedField::inline(
            "📥 Download link",
            format!(
                "[Click to download the backup archive]({})",
                summary.archive_url
            ),
        ));

    DiscordMessage::from_embed(embed)
}

/// Builds the error embed carrying `details` in a code block.
pub fn error_message(failed_at: &Zoned, details: &str) -> DiscordMessage {
    let description = format!(
        "A backup attempt of the MongoDB database has been performed today at {}. \
         An error was encountered during the backup process, you can find all \
         the information below.",
        clock(failed_at)
    );

    let embed = Embed::new("Failed MongoDB backup", description, ERROR_COLOR)
        .with_field(EmbedField::code_block("🔎 Backup error", details));

    DiscordMessage::from_embed(embed)
}

/// Posts messages to a single webhook URL.
///
/// Delivery problems are logged and reported as `false`, never returned as
/// errors.
#[derive(Clone)]
pub struct Notifier {
    provider: Arc<dyn WebhookProvider>,
    url: Url,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("host", &self.url.host_str())
            .finish_non_exhaustive()
    }
}

impl Notifier {
    pub fn new(provider: Arc<dyn WebhookProvider>, url: Url) -> Self {
        Self { provider, url }
    }

    /// Sends `message`, returning whether the endpoint accepted it.
    pub async fn send(&self, message: &DiscordMessage) -> bool {
        match self.try_send(message).await {
            Ok(response) => {
                tracing::info!(
                    target: TRACING_TARGET_NOTIFY,
                    status_code = response.status_code,
                    "notification delivered"
                );
                true
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET_NOTIFY,
                    stage = %Stage::Notify,
                    kind = %err.kind,
                    error = %err,
                    "failed to deliver notification"
                );
                false
            }
        }
    }

    async fn try_send(&self, message: &DiscordMessage) -> dumpvault_webhook::Result<WebhookResponse> {
        let request = WebhookRequest::json(self.url.clone(), message)?;
        self.provider.deliver(&request).await?.error_for_status()
    }
}
