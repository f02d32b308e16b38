//! Mock implementations for testing
//!
//! These mocks let the dispatcher run without a live bridge.

use super::traits::Transport;
use crate::bridge::TransportError;
use async_trait::async_trait;
use std::sync::Mutex;

// ============================================================================
// Mock Transport
// ============================================================================

/// One message the mock transport accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub text: String,
}

/// Transport that records every send, optionally failing from the n-th call
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<SentMessage>>,
    attempts: Mutex<usize>,
    fail_from: Option<usize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send from the `attempt`-th one on (zero-based)
    pub fn failing_from(attempt: usize) -> Self {
        Self {
            fail_from: Some(attempt),
            ..Self::default()
        }
    }

    /// Messages delivered so far, in send order
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts delivered to `recipient`, in send order
    pub fn texts_to(&self, recipient: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.recipient == recipient)
            .map(|m| m.text)
            .collect()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), TransportError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let current = *attempts;
            *attempts += 1;
            current
        };
        if self.fail_from.is_some_and(|from| attempt >= from) {
            return Err(TransportError::network("mock transport offline"));
        }

        self.sent.lock().unwrap().push(SentMessage {
            recipient: recipient.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_records_in_order() {
        let transport = MockTransport::new();
        transport.send_text("a", "one").await.unwrap();
        transport.send_text("b", "two").await.unwrap();
        transport.send_text("a", "three").await.unwrap();

        assert_eq!(transport.texts_to("a"), ["one", "three"]);
        assert_eq!(transport.sent().len(), 3);

        transport.clear();
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_mock_transport_fails_from_attempt() {
        let transport = MockTransport::failing_from(1);
        assert!(transport.send_text("a", "one").await.is_ok());
        let err = transport.send_text("a", "two").await.unwrap_err();
        assert!(err.kind.is_retryable());
        assert_eq!(transport.texts_to("a"), ["one"]);
    }
}
