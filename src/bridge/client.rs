//! HTTP client for the WhatsApp bridge's send endpoint

use super::TransportError;
use crate::runtime::Transport;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    jid: &'a str,
    text: &'a str,
}

/// Sends replies by POSTing them to `{base_url}/messages/send`
pub struct BridgeClient {
    client: Client,
    send_url: String,
    token: Option<String>,
}

impl BridgeClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| TransportError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            send_url: format!("{}/messages/send", base_url.trim_end_matches('/')),
            token,
        })
    }

    fn classify_error(status: reqwest::StatusCode, body: &str) -> TransportError {
        match status.as_u16() {
            401 | 403 => TransportError::auth(format!("Bridge refused credentials: {body}")),
            429 => TransportError::rate_limit(format!("Rate limited: {body}")),
            400..=499 => TransportError::rejected(format!("HTTP {status}: {body}")),
            500..=599 => TransportError::server_error(format!("Bridge error: {body}")),
            _ => TransportError::unknown(format!("HTTP {status}: {body}")),
        }
    }
}

#[async_trait]
impl Transport for BridgeClient {
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), TransportError> {
        let mut request = self.client.post(&self.send_url).json(&SendTextRequest {
            jid: recipient,
            text,
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                TransportError::network(format!("Connection failed: {e}"))
            } else {
                TransportError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
        Err(Self::classify_error(status, &body))
    }

    fn name(&self) -> &str {
        "bridge"
    }
}
