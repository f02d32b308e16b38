//! Pure session transition function
//!
//! Given the same session, message and context this always produces the
//! same update and replies. All I/O happens in the dispatcher.

use super::intake::{parse_student_count, IntakeProgress};
use super::prompts;
use super::state::{
    DeskContext, HandoffReason, InfoRequestSession, ParentContactSession, Requirement, Session,
    StudentIntake,
};
use super::{Effect, InboundMessage, SessionUpdate};

/// Result of a session transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub update: SessionUpdate,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    /// No reply, no state change
    pub fn ignored() -> Self {
        Self {
            update: SessionUpdate::Unchanged,
            effects: vec![],
        }
    }

    pub fn store(session: Session) -> Self {
        Self {
            update: SessionUpdate::Store(session),
            effects: vec![],
        }
    }

    pub fn retire() -> Self {
        Self {
            update: SessionUpdate::Retire,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_reply(mut self, text: impl Into<String>) -> Self {
        self.effects.push(Effect::send(text));
        self
    }

    /// Reply texts in send order
    #[allow(dead_code)] // Useful for tests
    pub fn replies(&self) -> impl Iterator<Item = &str> {
        self.effects.iter().map(|effect| match effect {
            Effect::SendText { text } => text.as_str(),
        })
    }
}

/// Pure transition function
pub fn transition(
    session: &Session,
    message: &InboundMessage,
    context: &DeskContext,
) -> TransitionResult {
    // Events without text never reach the step table
    let Some(text) = message.text.as_deref() else {
        return TransitionResult::ignored();
    };
    let keywords = &context.keywords;

    match session {
        // ============================================================
        // Human handoff: only the operator can wake the assistant
        // ============================================================
        Session::AwaitingHuman(_) => {
            if message.from_me && message.is_restart_command(keywords) {
                TransitionResult::store(Session::Initial).with_reply(prompts::REACTIVATED)
            } else {
                TransitionResult::ignored()
            }
        }

        // Operator messages outside a handoff are never answered
        _ if message.from_me => TransitionResult::ignored(),

        // Payment proofs preempt whatever step the sender is in
        _ if message.is_receipt_submission(keywords) => {
            TransitionResult::retire().with_reply(prompts::RECEIPT_ACKNOWLEDGED)
        }

        // ============================================================
        // Main menu
        // ============================================================
        Session::Initial => {
            TransitionResult::store(Session::ServiceSelection).with_reply(prompts::WELCOME)
        }

        Session::ServiceSelection => select_service(text),

        // ============================================================
        // Information request flow
        // ============================================================
        Session::InfoRequest(InfoRequestSession::CollectingCount) => {
            match parse_student_count(text) {
                Some(count) => {
                    let intake = StudentIntake::new(count);
                    let prompt = intake.opening_prompt();
                    TransitionResult::store(Session::InfoRequest(InfoRequestSession::Collecting(
                        intake,
                    )))
                    .with_reply(prompt)
                }
                None => {
                    TransitionResult::store(session.clone()).with_reply(prompts::INVALID_COUNT)
                }
            }
        }

        Session::InfoRequest(InfoRequestSession::Collecting(intake)) => {
            match intake.clone().accept(text) {
                IntakeProgress::Continue { intake, prompt } => TransitionResult::store(
                    Session::InfoRequest(InfoRequestSession::Collecting(intake)),
                )
                .with_reply(prompt),
                IntakeProgress::Complete(students) => TransitionResult::store(
                    Session::InfoRequest(InfoRequestSession::AwaitingRequirement { students }),
                )
                .with_reply(prompts::REQUIREMENT),
            }
        }

        Session::InfoRequest(InfoRequestSession::AwaitingRequirement { students }) => {
            match Requirement::from_choice(text) {
                Some(requirement) => {
                    let summary = prompts::request_summary(students, requirement);
                    TransitionResult::store(Session::awaiting_human(HandoffReason::InfoRequest {
                        requirement,
                        students: students.clone(),
                    }))
                    .with_reply(summary)
                }
                None => TransitionResult::store(session.clone())
                    .with_reply(prompts::INVALID_REQUIREMENT),
            }
        }

        // ============================================================
        // Contact finance team flow
        // ============================================================
        Session::SelectContactType => match text {
            "1" => TransitionResult::store(Session::ParentContact(
                ParentContactSession::CollectingCount,
            ))
            .with_reply(prompts::PARENT_COUNT),
            "2" => TransitionResult::store(Session::awaiting_human(HandoffReason::SupplierContact))
                .with_reply(prompts::SUPPLIER_CONTACT),
            _ => TransitionResult::store(Session::SelectContactType)
                .with_reply(prompts::INVALID_CONTACT_TYPE),
        },

        Session::ParentContact(ParentContactSession::CollectingCount) => {
            match parse_student_count(text) {
                Some(count) => {
                    let intake = StudentIntake::new(count);
                    let prompt = intake.opening_prompt();
                    TransitionResult::store(Session::ParentContact(
                        ParentContactSession::Collecting(intake),
                    ))
                    .with_reply(prompt)
                }
                None => {
                    TransitionResult::store(session.clone()).with_reply(prompts::INVALID_COUNT)
                }
            }
        }

        Session::ParentContact(ParentContactSession::Collecting(intake)) => {
            match intake.clone().accept(text) {
                IntakeProgress::Continue { intake, prompt } => TransitionResult::store(
                    Session::ParentContact(ParentContactSession::Collecting(intake)),
                )
                .with_reply(prompt),
                // Contact block goes out before the details summary
                IntakeProgress::Complete(students) => {
                    let details = prompts::student_details(&students);
                    TransitionResult::store(Session::awaiting_human(
                        HandoffReason::ParentContact { students },
                    ))
                    .with_reply(prompts::PARENT_CONTACT)
                    .with_reply(details)
                }
            }
        }

        // ============================================================
        // Recovery
        // ============================================================
        Session::Unrecognized => {
            TransitionResult::store(Session::Initial).with_reply(prompts::RESET)
        }
    }
}

fn select_service(choice: &str) -> TransitionResult {
    match choice {
        "1" => TransitionResult::store(Session::InfoRequest(InfoRequestSession::CollectingCount))
            .with_reply(prompts::INFO_COUNT),
        "2" => TransitionResult::store(Session::awaiting_human(
            HandoffReason::ReceiptInstructions,
        ))
        .with_reply(prompts::RECEIPT_INSTRUCTIONS),
        "3" => TransitionResult::retire().with_reply(prompts::PAYMENT_PLANS),
        "4" => {
            TransitionResult::store(Session::SelectContactType).with_reply(prompts::CONTACT_TYPE)
        }
        _ => {
            TransitionResult::store(Session::ServiceSelection).with_reply(prompts::INVALID_SERVICE)
        }
    }
}
