//! HTTP API: liveness probes, status census and the bridge webhook

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::SessionStore;
use crate::state_machine::InboundMessage;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub inbound_tx: mpsc::Sender<InboundMessage>,
    /// Bearer token required on the webhook
    pub webhook_token: Arc<str>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        inbound_tx: mpsc::Sender<InboundMessage>,
        webhook_token: &str,
    ) -> Self {
        Self {
            store,
            inbound_tx,
            webhook_token: Arc::from(webhook_token),
            started_at: Instant::now(),
        }
    }
}
