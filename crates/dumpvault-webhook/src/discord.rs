//! Discord "execute webhook" message body.
//!
//! Only the subset of the Discord message object used by backup reports is
//! modelled: a nullable `content`, a list of embeds, and an empty attachment
//! list.

use serde::{Deserialize, Serialize};

/// Maximum number of characters Discord accepts in an embed field value.
pub const FIELD_VALUE_LIMIT: usize = 1024;

const ELLIPSIS: char = '…';
const CODE_FENCE: &str = "```";

/// JSON body posted to a Discord webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordMessage {
    /// Plain message text, serialized as `null` when absent.
    pub content: Option<String>,
    /// Rich embeds shown under the message.
    pub embeds: Vec<Embed>,
    /// Always empty; files are linked rather than attached.
    pub attachments: Vec<serde_json::Value>,
}

impl DiscordMessage {
    /// Creates a message with a single embed and no text content.
    pub fn from_embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
            attachments: Vec::new(),
        }
    }
}

/// A single Discord embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    /// Sidebar color as a decimal RGB integer.
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(title: impl Into<String>, description: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn with_field(mut self, field: EmbedField) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up a field by its exact name.
    pub fn field(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A name/value pair rendered inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    /// Creates an inline field, keeping the tail of an oversized value.
    pub fn inline(name: impl Into<String>, value: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            value: truncate_tail(value.as_ref(), FIELD_VALUE_LIMIT),
            inline: true,
        }
    }

    /// Creates a full-width field whose value is wrapped in a code block.
    ///
    /// The text is shortened before wrapping so the fences always survive.
    pub fn code_block(name: impl Into<String>, text: impl AsRef<str>) -> Self {
        let budget = FIELD_VALUE_LIMIT - 2 * CODE_FENCE.len();
        let text = truncate_tail(text.as_ref(), budget);
        Self {
            name: name.into(),
            value: format!("{CODE_FENCE}{text}{CODE_FENCE}"),
            inline: false,
        }
    }
}

/// Keeps the last `limit` characters of `value`, marking the cut.
fn truncate_tail(value: &str, limit: usize) -> String {
    let len = value.chars().count();
    if len <= limit {
        return value.to_string();
    }

    let keep = limit.saturating_sub(1);
    let tail: String = value.chars().skip(len - keep).collect();
    format!("{ELLIPSIS}{tail}")
}
