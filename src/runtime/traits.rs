//! Trait abstractions for runtime I/O
//!
//! These traits let the dispatcher run against mock transports and stores.

use crate::bridge::TransportError;
use crate::state_machine::{Session, Step};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outbound half of the messaging transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one text message; resolves once the transport accepted it
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), TransportError>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Per-sender session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, sender: &str) -> Option<Session>;

    async fn set(&self, sender: &str, session: Session);

    async fn delete(&self, sender: &str);

    /// Number of senders with a live session
    async fn len(&self) -> usize;

    #[allow(dead_code)] // API completeness
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// How many sessions sit at each step
    async fn step_counts(&self) -> BTreeMap<Step, usize>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), TransportError> {
        (**self).send_text(recipient, text).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get(&self, sender: &str) -> Option<Session> {
        (**self).get(sender).await
    }

    async fn set(&self, sender: &str, session: Session) {
        (**self).set(sender, session).await;
    }

    async fn delete(&self, sender: &str) {
        (**self).delete(sender).await;
    }

    async fn len(&self) -> usize {
        (**self).len().await
    }

    async fn step_counts(&self) -> BTreeMap<Step, usize> {
        (**self).step_counts().await
    }
}
