//! Runtime wiring between the transport, the session store and the
//! dialogue engine

mod dispatcher;
mod store;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use dispatcher::Dispatcher;
pub use store::InMemorySessionStore;
pub use traits::*;

use crate::state_machine::{DeskContext, InboundMessage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Inbound messages buffered ahead of the dispatcher
pub const INBOUND_QUEUE_DEPTH: usize = 256;

/// Spawn a dispatcher task; returns the handle used to feed it messages
pub fn spawn_dispatcher<S, T>(
    context: DeskContext,
    store: S,
    transport: T,
) -> (mpsc::Sender<InboundMessage>, JoinHandle<()>)
where
    S: SessionStore + 'static,
    T: Transport + 'static,
{
    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE_DEPTH);
    let dispatcher = Dispatcher::new(context, store, transport, inbound_rx);
    (inbound_tx, tokio::spawn(dispatcher.run()))
}
