//! In-memory session store
//!
//! Sessions live for the life of the process. Nothing expires and nothing
//! is written to disk.

use super::traits::SessionStore;
use crate::state_machine::{Session, Step};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Map from sender address to session
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, sender: &str) -> Option<Session> {
        self.sessions.read().await.get(sender).cloned()
    }

    async fn set(&self, sender: &str, session: Session) {
        self.sessions
            .write()
            .await
            .insert(sender.to_string(), session);
    }

    async fn delete(&self, sender: &str) {
        self.sessions.write().await.remove(sender);
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn step_counts(&self) -> BTreeMap<Step, usize> {
        let sessions = self.sessions.read().await;
        let mut counts = BTreeMap::new();
        for session in sessions.values() {
            *counts.entry(session.step()).or_insert(0) += 1;
        }
        counts
    }
}
