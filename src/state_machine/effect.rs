//! Effects produced by session transitions

use super::state::Session;

/// Effects to be executed after a transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a text reply to the sender. Each send completes before the next starts.
    SendText { text: String },
}

impl Effect {
    pub fn send(text: impl Into<String>) -> Self {
        Effect::SendText { text: text.into() }
    }
}

/// What the store should do with the sender's session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Leave the stored entry exactly as it was (including absent)
    Unchanged,
    /// Store this session for the sender
    Store(Session),
    /// Remove the sender's entry; the next message starts fresh
    Retire,
}
