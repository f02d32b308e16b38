//! Service configuration from the environment

use crate::state_machine::{DeskContext, Keywords};
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },
    #[error("BRIDGE_URL must start with http:// or https://, got {0:?}")]
    InvalidBridgeUrl(String),
    #[error("WEBHOOK_TOKEN (or BRIDGE_TOKEN) must be set to authenticate inbound webhooks")]
    MissingWebhookToken,
}

/// Configuration read once at startup
#[derive(Debug, Clone)]
pub struct DeskConfig {
    pub port: u16,
    /// Base URL of the WhatsApp bridge; replies are only logged when unset
    pub bridge_url: Option<String>,
    pub bridge_token: Option<String>,
    /// Bearer token the bridge must present on `POST /webhook/messages`
    pub webhook_token: String,
    pub extra_restart_keywords: Vec<String>,
    pub extra_receipt_keywords: Vec<String>,
}

impl DeskConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        let bridge_url = get("BRIDGE_URL");
        if let Some(url) = &bridge_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidBridgeUrl(url.clone()));
            }
        }

        let bridge_token = get("BRIDGE_TOKEN");
        let webhook_token = get("WEBHOOK_TOKEN")
            .or_else(|| bridge_token.clone())
            .ok_or(ConfigError::MissingWebhookToken)?;

        Ok(Self {
            port,
            bridge_url,
            bridge_token,
            webhook_token,
            extra_restart_keywords: split_list(get("DESK_EXTRA_RESTART_KEYWORDS")),
            extra_receipt_keywords: split_list(get("DESK_EXTRA_RECEIPT_KEYWORDS")),
        })
    }

    /// Dialogue engine context with the configured keyword additions
    pub fn desk_context(&self) -> DeskContext {
        DeskContext::new(Keywords::default().with_extra(
            self.extra_restart_keywords.clone(),
            self.extra_receipt_keywords.clone(),
        ))
    }
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
