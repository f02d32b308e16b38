//! Inbound message dispatcher
//!
//! Owns the receive loop. Messages are handled strictly one at a time: the
//! session update and every reply send of one message finish before the next
//! message is looked at.

use super::traits::{SessionStore, Transport};
use crate::bridge::TransportError;
use crate::state_machine::{transition, DeskContext, Effect, InboundMessage, SessionUpdate};
use tokio::sync::mpsc;

/// Sequential dispatcher over any store and transport
pub struct Dispatcher<S, T>
where
    S: SessionStore + 'static,
    T: Transport + 'static,
{
    context: DeskContext,
    store: S,
    transport: T,
    inbound_rx: mpsc::Receiver<InboundMessage>,
}

impl<S, T> Dispatcher<S, T>
where
    S: SessionStore + 'static,
    T: Transport + 'static,
{
    pub fn new(
        context: DeskContext,
        store: S,
        transport: T,
        inbound_rx: mpsc::Receiver<InboundMessage>,
    ) -> Self {
        Self {
            context,
            store,
            transport,
            inbound_rx,
        }
    }

    /// Process messages until every sender handle is dropped
    pub async fn run(mut self) {
        tracing::info!(transport = %self.transport.name(), "Starting dispatcher");

        while let Some(message) = self.inbound_rx.recv().await {
            if let Err(e) = self.process(message).await {
                tracing::error!(
                    error = %e,
                    retryable = e.kind.is_retryable(),
                    "Failed to deliver reply"
                );
            }
        }

        tracing::info!("Dispatcher stopped");
    }

    /// Handle one inbound message end to end
    pub async fn process(&self, message: InboundMessage) -> Result<(), TransportError> {
        if message.text.is_none() {
            tracing::debug!(sender = %message.sender, "Skipping message without text");
            return Ok(());
        }

        tracing::info!(
            sender = %message.sender,
            from_me = message.from_me,
            has_image = message.has_image,
            has_document = message.has_document,
            text = %message.body(),
            "Inbound message"
        );

        let current = self.store.get(&message.sender).await.unwrap_or_default();
        let result = transition(&current, &message, &self.context);

        match result.update {
            SessionUpdate::Unchanged => {
                tracing::debug!(
                    sender = %message.sender,
                    step = %current.step(),
                    "Message ignored"
                );
            }
            SessionUpdate::Store(next) => {
                if current.is_awaiting_human() && !next.is_awaiting_human() {
                    tracing::info!(sender = %message.sender, "Assistant reactivated by operator");
                } else if next.is_awaiting_human() && !current.is_awaiting_human() {
                    tracing::info!(
                        sender = %message.sender,
                        contact_type = ?next.contact_type(),
                        "Handed off to finance team"
                    );
                }
                tracing::debug!(
                    sender = %message.sender,
                    from = %current.step(),
                    to = %next.step(),
                    "Session transition"
                );
                self.store.set(&message.sender, next).await;
            }
            SessionUpdate::Retire => {
                tracing::info!(sender = %message.sender, step = %current.step(), "Session retired");
                self.store.delete(&message.sender).await;
            }
        }

        for effect in result.effects {
            self.execute_effect(&message.sender, effect).await?;
        }

        Ok(())
    }

    async fn execute_effect(&self, sender: &str, effect: Effect) -> Result<(), TransportError> {
        match effect {
            Effect::SendText { text } => self.transport.send_text(sender, &text).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::store::InMemorySessionStore;
    use crate::runtime::testing::MockTransport;
    use crate::state_machine::{prompts, Session, Step};
    use std::sync::Arc;

    const PARENT: &str = "201112223334@s.whatsapp.net";

    struct TestDesk {
        store: Arc<InMemorySessionStore>,
        transport: Arc<MockTransport>,
        dispatcher: Dispatcher<Arc<InMemorySessionStore>, Arc<MockTransport>>,
    }

    impl TestDesk {
        fn new() -> Self {
            Self::with_transport(MockTransport::new())
        }

        fn with_transport(transport: MockTransport) -> Self {
            let store = Arc::new(InMemorySessionStore::new());
            let transport = Arc::new(transport);
            let (_tx, rx) = mpsc::channel(8);
            let dispatcher = Dispatcher::new(
                DeskContext::default(),
                Arc::clone(&store),
                Arc::clone(&transport),
                rx,
            );
            Self {
                store,
                transport,
                dispatcher,
            }
        }

        async fn user(&self, text: &str) {
            self.dispatcher
                .process(InboundMessage::text(PARENT, text))
                .await
                .unwrap();
        }

        async fn operator(&self, text: &str) {
            self.dispatcher
                .process(InboundMessage::from_operator(PARENT, text))
                .await
                .unwrap();
        }

        async fn step(&self) -> Option<Step> {
            self.store.get(PARENT).await.map(|s| s.step())
        }
    }

    #[tokio::test]
    async fn test_first_message_creates_session() {
        let desk = TestDesk::new();
        desk.user("Hello").await;

        assert_eq!(desk.step().await, Some(Step::ServiceSelection));
        assert_eq!(desk.transport.texts_to(PARENT), [prompts::WELCOME]);
    }

    #[tokio::test]
    async fn test_payment_plans_retire_session() {
        let desk = TestDesk::new();
        desk.user("hi").await;
        desk.user("3").await;

        assert_eq!(desk.step().await, None);
        assert_eq!(desk.transport.texts_to(PARENT).last().unwrap(), prompts::PAYMENT_PLANS);

        // Next message starts over
        desk.user("hi again").await;
        assert_eq!(desk.step().await, Some(Step::ServiceSelection));
    }

    #[tokio::test]
    async fn test_full_info_request_then_operator_restart() {
        let desk = TestDesk::new();
        for text in [
            "hi", "1", "2", "Ali", "Y1 British", "501", "Sara", "G2 American", "502", "1",
        ] {
            desk.user(text).await;
        }
        assert_eq!(desk.step().await, Some(Step::TeamContactRequested));
        let summary = desk.transport.texts_to(PARENT).pop().unwrap();
        assert_eq!(summary.matches("**Student ").count(), 2);

        // User is ignored while the finance team follows up
        desk.transport.clear();
        desk.user("hello?").await;
        desk.user("1").await;
        assert!(desk.transport.sent().is_empty());
        assert_eq!(desk.step().await, Some(Step::TeamContactRequested));

        // Unrelated operator message changes nothing
        desk.operator("Looking into it now").await;
        assert!(desk.transport.sent().is_empty());

        desk.operator("Payment Received, thanks").await;
        assert_eq!(desk.step().await, Some(Step::Initial));
        assert_eq!(desk.transport.texts_to(PARENT), [prompts::REACTIVATED]);

        desk.user("hi").await;
        assert_eq!(desk.step().await, Some(Step::ServiceSelection));
    }

    #[tokio::test]
    async fn test_parent_flow_sends_two_messages_in_order() {
        let desk = TestDesk::new();
        for text in ["hi", "4", "1", "1", "Malak", "Y6 British", "8080"] {
            desk.user(text).await;
        }
        let texts = desk.transport.texts_to(PARENT);
        let tail = &texts[texts.len() - 2..];
        assert_eq!(tail[0], prompts::PARENT_CONTACT);
        assert!(tail[1].contains("Malak"));
        assert_eq!(desk.step().await, Some(Step::TeamContactRequested));
    }

    #[tokio::test]
    async fn test_receipt_deletes_session() {
        let desk = TestDesk::new();
        desk.user("hi").await;
        desk.dispatcher
            .process(InboundMessage::text(PARENT, "").with_image())
            .await
            .unwrap();

        assert_eq!(desk.step().await, None);
        assert_eq!(
            desk.transport.texts_to(PARENT).last().unwrap(),
            prompts::RECEIPT_ACKNOWLEDGED
        );
    }

    #[tokio::test]
    async fn test_operator_message_to_unseen_sender_creates_nothing() {
        let desk = TestDesk::new();
        desk.operator("hello from the office").await;
        assert_eq!(desk.step().await, None);
        assert!(desk.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_textless_event_is_skipped() {
        let desk = TestDesk::new();
        let message = InboundMessage {
            text: None,
            ..InboundMessage::text(PARENT, "")
        };
        desk.dispatcher.process(message).await.unwrap();
        assert_eq!(desk.step().await, None);
        assert!(desk.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_failed_send_keeps_session_update() {
        let desk = TestDesk::with_transport(MockTransport::failing_from(0));
        let err = desk
            .dispatcher
            .process(InboundMessage::text(PARENT, "hi"))
            .await
            .unwrap_err();
        assert!(err.kind.is_retryable());
        assert_eq!(desk.step().await, Some(Step::ServiceSelection));
    }

    #[tokio::test]
    async fn test_parent_completion_stops_after_failed_contact_send() {
        let desk = TestDesk::with_transport(MockTransport::failing_from(6));
        for text in ["hi", "4", "1", "1", "Malak", "Y6 British"] {
            desk.user(text).await;
        }
        let result = desk
            .dispatcher
            .process(InboundMessage::text(PARENT, "8080"))
            .await;
        assert!(result.is_err());
        // Summary must never go out without the contact block before it
        assert!(!desk
            .transport
            .texts_to(PARENT)
            .iter()
            .any(|t| t.contains("Student Details")));
    }

    #[tokio::test]
    async fn test_run_drains_channel_in_order() {
        let store = Arc::new(InMemorySessionStore::new());
        let transport = Arc::new(MockTransport::new());
        let (tx, rx) = mpsc::channel(8);
        let dispatcher = Dispatcher::new(
            DeskContext::default(),
            Arc::clone(&store),
            Arc::clone(&transport),
            rx,
        );
        let handle = tokio::spawn(dispatcher.run());

        for text in ["hi", "4", "9"] {
            tx.send(InboundMessage::text(PARENT, text)).await.unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        assert_eq!(
            transport.texts_to(PARENT),
            [
                prompts::WELCOME,
                prompts::CONTACT_TYPE,
                prompts::INVALID_CONTACT_TYPE
            ]
        );
        assert_eq!(
            store.get(PARENT).await,
            Some(Session::SelectContactType)
        );
    }
}
