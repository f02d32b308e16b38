//! API response types

use serde::Serialize;
use std::collections::BTreeMap;

/// Response for `GET /`
#[derive(Debug, Serialize)]
pub struct AliveResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub sessions: usize,
}

/// Response for `GET /health`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    pub active_sessions: usize,
}

/// Response for `GET /status`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub bot_status: &'static str,
    pub active_sessions: usize,
    /// Seconds since the process started
    pub uptime: u64,
    pub timestamp: String,
    /// Session count per step tag
    pub steps: BTreeMap<&'static str, usize>,
}

/// Response for `GET /version`
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: &'static str,
    pub version: &'static str,
}

/// Response for `POST /webhook/messages`
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    /// False when the event carried nothing the assistant handles
    pub queued: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
