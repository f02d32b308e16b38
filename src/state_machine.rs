//! Per-sender dialogue state machine
//!
//! Elm-style split: [`Session`] is the state, [`InboundMessage`] the event,
//! [`Effect`] the output, and [`transition`] the pure function between them.

mod effect;
pub mod event;
mod intake;
pub mod prompts;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, SessionUpdate};
pub use event::InboundMessage;
pub use state::{DeskContext, Keywords, Session, Step};
pub use transition::transition;
