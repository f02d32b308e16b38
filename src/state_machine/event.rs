//! Inbound messages that drive session transitions

use super::state::Keywords;
use serde::{Deserialize, Serialize};

/// One classified inbound message from the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender address (e.g. `201001234567@s.whatsapp.net`)
    pub sender: String,
    /// Plain text body, from either the simple or the formatted text field
    pub text: Option<String>,
    #[serde(default)]
    pub has_image: bool,
    #[serde(default)]
    pub has_document: bool,
    /// Sent from the assistant's own number, i.e. by the operator
    #[serde(default)]
    pub from_me: bool,
}

impl InboundMessage {
    /// Plain user-originated text message
    #[allow(dead_code)] // Useful for tests
    pub fn text(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: Some(text.into()),
            has_image: false,
            has_document: false,
            from_me: false,
        }
    }

    /// Text message typed by the operator on the assistant's own number
    #[allow(dead_code)] // Useful for tests
    pub fn from_operator(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from_me: true,
            ..Self::text(sender, text)
        }
    }

    #[must_use]
    #[allow(dead_code)] // Useful for tests
    pub fn with_image(mut self) -> Self {
        self.has_image = true;
        self
    }

    #[must_use]
    #[allow(dead_code)] // Useful for tests
    pub fn with_document(mut self) -> Self {
        self.has_document = true;
        self
    }

    pub fn has_attachment(&self) -> bool {
        self.has_image || self.has_document
    }

    /// Body text, or an empty string when the message carries none
    pub fn body(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Whether the operator is handing this sender back to the assistant
    pub fn is_restart_command(&self, keywords: &Keywords) -> bool {
        let lowered = self.body().to_lowercase();
        keywords
            .restart
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
            || lowered == keywords.agent_sign_off
    }

    /// Whether this message looks like a payment proof
    pub fn is_receipt_submission(&self, keywords: &Keywords) -> bool {
        if self.has_attachment() {
            return true;
        }
        let lowered = self.body().to_lowercase();
        keywords
            .receipt
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }
}
