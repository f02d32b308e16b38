//! Property-based tests for the dialogue state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> DeskContext {
    DeskContext::default()
}

/// Apply a transition result the way the dispatcher does
fn apply(session: Session, result: &TransitionResult) -> Session {
    match &result.update {
        SessionUpdate::Store(next) => next.clone(),
        SessionUpdate::Retire => Session::Initial,
        SessionUpdate::Unchanged => session,
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

// Letters b..h cannot spell any receipt keyword
fn arb_plain_word() -> impl Strategy<Value = String> {
    "[A-Z][b-h]{1,8}".prop_map(String::from)
}

fn arb_student() -> impl Strategy<Value = Student> {
    (arb_plain_word(), "[YG][1-9] [A-Z][b-h]{2,6}", "[0-9]{3,6}").prop_map(|(name, year, id)| {
        Student { name, year, id }
    })
}

fn arb_intake() -> impl Strategy<Value = StudentIntake> {
    (1u8..=10)
        .prop_flat_map(|count| {
            (
                Just(count),
                proptest::collection::vec(arb_student(), 0..usize::from(count)),
                arb_student(),
                0u8..3,
            )
        })
        .prop_map(|(count, students, partial, field)| StudentIntake {
            count,
            students,
            awaiting: match field {
                0 => IntakeField::Name,
                1 => IntakeField::Year { name: partial.name },
                _ => IntakeField::Id {
                    name: partial.name,
                    year: partial.year,
                },
            },
        })
}

fn arb_handoff_reason() -> impl Strategy<Value = HandoffReason> {
    prop_oneof![
        Just(HandoffReason::ReceiptInstructions),
        Just(HandoffReason::SupplierContact),
        proptest::collection::vec(arb_student(), 1..4)
            .prop_map(|students| HandoffReason::ParentContact { students }),
        proptest::collection::vec(arb_student(), 1..4).prop_map(|students| {
            HandoffReason::InfoRequest {
                requirement: Requirement::PaymentLink,
                students,
            }
        }),
    ]
}

fn arb_active_session() -> impl Strategy<Value = Session> {
    prop_oneof![
        Just(Session::Initial),
        Just(Session::ServiceSelection),
        Just(Session::SelectContactType),
        Just(Session::Unrecognized),
        Just(Session::InfoRequest(InfoRequestSession::CollectingCount)),
        Just(Session::ParentContact(ParentContactSession::CollectingCount)),
        arb_intake().prop_map(|i| Session::InfoRequest(InfoRequestSession::Collecting(i))),
        arb_intake().prop_map(|i| Session::ParentContact(ParentContactSession::Collecting(i))),
        proptest::collection::vec(arb_student(), 1..4).prop_map(|students| {
            Session::InfoRequest(InfoRequestSession::AwaitingRequirement { students })
        }),
    ]
}

fn arb_awaiting_session() -> impl Strategy<Value = Session> {
    arb_handoff_reason().prop_map(Session::awaiting_human)
}

fn arb_session() -> impl Strategy<Value = Session> {
    prop_oneof![arb_active_session(), arb_awaiting_session()]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,3}".prop_map(String::from),
        "[a-zA-Z ]{0,30}".prop_map(String::from),
        Just("begin".to_string()),
        Just("Payment received".to_string()),
        Just("receipt".to_string()),
    ]
}

fn arb_message() -> impl Strategy<Value = InboundMessage> {
    (
        proptest::option::of(arb_text()),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(text, has_image, has_document, from_me)| InboundMessage {
            sender: "test-sender".to_string(),
            text,
            has_image,
            has_document,
            from_me,
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_transition_is_deterministic(session in arb_session(), message in arb_message()) {
        let ctx = test_context();
        prop_assert_eq!(
            transition(&session, &message, &ctx),
            transition(&session, &message, &ctx)
        );
    }

    #[test]
    fn prop_missing_text_never_dispatches(session in arb_session(), mut message in arb_message()) {
        message.text = None;
        prop_assert_eq!(transition(&session, &message, &test_context()), TransitionResult::ignored());
    }

    #[test]
    fn prop_operator_ignored_outside_handoff(session in arb_active_session(), mut message in arb_message()) {
        message.from_me = true;
        prop_assert_eq!(transition(&session, &message, &test_context()), TransitionResult::ignored());
    }

    #[test]
    fn prop_user_ignored_during_handoff(session in arb_awaiting_session(), mut message in arb_message()) {
        message.from_me = false;
        prop_assert_eq!(transition(&session, &message, &test_context()), TransitionResult::ignored());
    }

    #[test]
    fn prop_operator_during_handoff_resets_or_ignores(
        session in arb_awaiting_session(),
        text in arb_text(),
    ) {
        let ctx = test_context();
        let message = InboundMessage::from_operator("test-sender", text);
        let result = transition(&session, &message, &ctx);
        if message.is_restart_command(&ctx.keywords) {
            prop_assert_eq!(&result.update, &SessionUpdate::Store(Session::Initial));
            prop_assert_eq!(result.replies().collect::<Vec<_>>(), vec![prompts::REACTIVATED]);
        } else {
            prop_assert_eq!(result, TransitionResult::ignored());
        }
    }

    #[test]
    fn prop_attachment_always_retires(session in arb_active_session(), text in arb_text(), image in any::<bool>()) {
        let message = InboundMessage::text("test-sender", text);
        let message = if image { message.with_image() } else { message.with_document() };
        let result = transition(&session, &message, &test_context());
        prop_assert_eq!(&result.update, &SessionUpdate::Retire);
        prop_assert_eq!(result.replies().collect::<Vec<_>>(), vec![prompts::RECEIPT_ACKNOWLEDGED]);
    }

    #[test]
    fn prop_user_message_gets_a_reply(session in arb_active_session(), text in arb_text()) {
        let result = transition(&session, &InboundMessage::text("test-sender", text), &test_context());
        let replies = result.replies().count();
        prop_assert!((1..=2).contains(&replies));
        prop_assert_ne!(&result.update, &SessionUpdate::Unchanged);
    }

    #[test]
    fn prop_intake_index_stays_in_bounds(intake in arb_intake(), answer in arb_plain_word()) {
        let count = usize::from(intake.count);
        prop_assert!(intake.current_index() < count);

        let session = Session::ParentContact(ParentContactSession::Collecting(intake.clone()));
        let result = transition(&session, &InboundMessage::text("test-sender", answer), &test_context());

        match apply(session, &result) {
            Session::ParentContact(ParentContactSession::Collecting(next)) => {
                prop_assert!(next.current_index() < count);
                let advanced = next.current_index() - intake.current_index();
                prop_assert!(advanced <= 1);
            }
            Session::AwaitingHuman(awaiting) => {
                let HandoffReason::ParentContact { students } = awaiting.reason else {
                    return Err(TestCaseError::fail("wrong handoff reason"));
                };
                prop_assert_eq!(students.len(), count);
                prop_assert_eq!(result.replies().count(), 2);
            }
            other => return Err(TestCaseError::fail(format!("unexpected session {other:?}"))),
        }
    }

    #[test]
    fn prop_info_cycle_collects_every_student(students in proptest::collection::vec(arb_student(), 1..=10)) {
        let ctx = test_context();
        let mut answers = vec![students.len().to_string()];
        for student in &students {
            answers.push(student.name.clone());
            answers.push(student.year.clone());
            answers.push(student.id.clone());
        }

        let mut session = Session::InfoRequest(InfoRequestSession::CollectingCount);
        for answer in answers {
            let result = transition(&session, &InboundMessage::text("test-sender", answer), &ctx);
            prop_assert_eq!(result.replies().count(), 1);
            session = apply(session, &result);
        }

        prop_assert_eq!(
            session,
            Session::InfoRequest(InfoRequestSession::AwaitingRequirement { students })
        );
    }

    #[test]
    fn prop_out_of_range_counts_do_not_advance(n in 11u32..100_000) {
        let session = Session::InfoRequest(InfoRequestSession::CollectingCount);
        let result = transition(&session, &InboundMessage::text("test-sender", n.to_string()), &test_context());
        prop_assert_eq!(&result.update, &SessionUpdate::Store(session));
        prop_assert_eq!(result.replies().collect::<Vec<_>>(), vec![prompts::INVALID_COUNT]);
    }
}
