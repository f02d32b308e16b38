//! Wire shape of the bridge's `messages.upsert` events
//!
//! The bridge forwards the WhatsApp client's upsert batches verbatim. Only
//! the handful of fields the assistant reads are modeled; the rest is
//! ignored.

use crate::state_machine::InboundMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upsert type for live messages, as opposed to history sync or appends
pub const NOTIFY: &str = "notify";

/// One `messages.upsert` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub messages: Vec<WebMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebMessage {
    pub key: MessageKey,
    #[serde(default)]
    pub message: Option<MessageContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageKey {
    #[serde(default)]
    pub remote_jid: Option<String>,
    #[serde(default)]
    pub from_me: bool,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    #[serde(default)]
    pub conversation: Option<String>,
    #[serde(default)]
    pub extended_text_message: Option<ExtendedTextMessage>,
    #[serde(default)]
    pub image_message: Option<Value>,
    #[serde(default)]
    pub document_message: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedTextMessage {
    #[serde(default)]
    pub text: Option<String>,
}

impl MessageContent {
    /// Plain text, preferring the simple field. Empty strings count as absent.
    pub fn text(&self) -> Option<&str> {
        let plain = self.conversation.as_deref().filter(|t| !t.is_empty());
        plain.or_else(|| {
            self.extended_text_message
                .as_ref()
                .and_then(|ext| ext.text.as_deref())
                .filter(|t| !t.is_empty())
        })
    }
}

impl UpsertEvent {
    /// Classify the batch into the message the dispatcher should see.
    ///
    /// Only live (`notify`) batches are handled, and only their first message.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        if self.kind != NOTIFY {
            return None;
        }
        self.messages.into_iter().next()?.into_inbound()
    }
}

impl WebMessage {
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let sender = self.key.remote_jid.filter(|jid| !jid.is_empty())?;
        let content = self.message.unwrap_or_default();

        Some(InboundMessage {
            sender,
            text: content.text().map(str::to_string),
            has_image: content.image_message.is_some(),
            has_document: content.document_message.is_some(),
            from_me: self.key.from_me,
        })
    }
}
