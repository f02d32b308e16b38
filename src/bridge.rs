//! WhatsApp bridge transport
//!
//! The bridge owns the WhatsApp connection (pairing, credentials,
//! reconnects). This service receives its upsert events over HTTP and sends
//! replies back through its send endpoint.

mod client;
mod error;
pub mod payload;

pub use client::BridgeClient;
pub use error::TransportError;
#[allow(unused_imports)] // Matched on in tests
pub use error::TransportErrorKind;

use crate::runtime::Transport;
use async_trait::async_trait;
use std::sync::Arc;

/// Logging wrapper for transports
pub struct LoggingTransport {
    inner: Arc<dyn Transport>,
}

impl LoggingTransport {
    pub fn new(inner: Arc<dyn Transport>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for LoggingTransport {
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.send_text(recipient, text).await;
        let duration = start.elapsed();

        match &result {
            Ok(()) => {
                tracing::info!(
                    transport = %self.inner.name(),
                    recipient = %recipient,
                    duration_ms = %duration.as_millis(),
                    chars = text.chars().count(),
                    "Reply sent"
                );
            }
            Err(e) => {
                tracing::error!(
                    transport = %self.inner.name(),
                    recipient = %recipient,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Reply failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Transport used when no bridge is configured: replies are only logged
#[derive(Debug, Default)]
pub struct DryRunTransport;

#[async_trait]
impl Transport for DryRunTransport {
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), TransportError> {
        tracing::info!(recipient = %recipient, text = %text, "Dry run reply");
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
