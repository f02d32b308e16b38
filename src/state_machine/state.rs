//! Session state types

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Student Records
// ============================================================================

/// One student as entered by the sender, field by field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub year: String,
    pub id: String,
}

/// Which field of the current student the sender is being asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum IntakeField {
    Name,
    Year { name: String },
    Id { name: String, year: String },
}

/// Bounded collection of `count` student records.
///
/// The index of the student being collected is `students.len()`, so it can
/// never run past `count`: the intake completes the moment the last id lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentIntake {
    pub count: u8,
    pub students: Vec<Student>,
    pub awaiting: IntakeField,
}

impl StudentIntake {
    pub fn new(count: u8) -> Self {
        Self {
            count,
            students: Vec::with_capacity(usize::from(count)),
            awaiting: IntakeField::Name,
        }
    }

    /// Zero-based index of the student currently being collected
    pub fn current_index(&self) -> usize {
        self.students.len()
    }
}

// ============================================================================
// Flow Sessions
// ============================================================================

/// Sub-states of the "request information/documents" flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum InfoRequestSession {
    CollectingCount,
    Collecting(StudentIntake),
    AwaitingRequirement { students: Vec<Student> },
}

/// Sub-states of the "contact finance team as a parent" flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ParentContactSession {
    CollectingCount,
    Collecting(StudentIntake),
}

/// Relation of the sender to the school, chosen under "contact finance team"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactType {
    Parent,
    Supplier,
}

/// What the sender asked for in the info-request flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    PaymentOrder,
    PaymentLink,
    TeamContact,
}

impl Requirement {
    /// Map a menu digit to a requirement
    pub fn from_choice(text: &str) -> Option<Self> {
        match text {
            "1" => Some(Self::PaymentOrder),
            "2" => Some(Self::PaymentLink),
            "3" => Some(Self::TeamContact),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PaymentOrder => "Payment Order",
            Self::PaymentLink => "Payment Link",
            Self::TeamContact => "Other - Team Contact Needed",
        }
    }
}

/// Why the assistant stepped aside for a human
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandoffReason {
    ReceiptInstructions,
    InfoRequest {
        requirement: Requirement,
        students: Vec<Student>,
    },
    ParentContact { students: Vec<Student> },
    SupplierContact,
}

impl HandoffReason {
    pub fn contact_type(&self) -> Option<ContactType> {
        match self {
            Self::ParentContact { .. } => Some(ContactType::Parent),
            Self::SupplierContact => Some(ContactType::Supplier),
            Self::ReceiptInstructions | Self::InfoRequest { .. } => None,
        }
    }
}

/// Session frozen until the operator sends a restart keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwaitingHumanSession {
    pub reason: HandoffReason,
}

// ============================================================================
// Session
// ============================================================================

/// Per-sender dialogue state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Initial,
    ServiceSelection,
    InfoRequest(InfoRequestSession),
    SelectContactType,
    ParentContact(ParentContactSession),
    #[serde(rename = "team_contact_requested")]
    AwaitingHuman(AwaitingHumanSession),
    /// Any step tag this build does not know; recovered by a reset
    #[serde(other)]
    Unrecognized,
}

impl Session {
    pub fn awaiting_human(reason: HandoffReason) -> Self {
        Session::AwaitingHuman(AwaitingHumanSession { reason })
    }

    pub fn is_awaiting_human(&self) -> bool {
        matches!(self, Session::AwaitingHuman(_))
    }

    pub fn contact_type(&self) -> Option<ContactType> {
        match self {
            Session::ParentContact(_) => Some(ContactType::Parent),
            Session::AwaitingHuman(awaiting) => awaiting.reason.contact_type(),
            _ => None,
        }
    }

    /// The flat step tag for this session
    pub fn step(&self) -> Step {
        match self {
            Session::Initial => Step::Initial,
            Session::ServiceSelection => Step::ServiceSelection,
            Session::InfoRequest(InfoRequestSession::CollectingCount) => {
                Step::CollectInfoStudentCount
            }
            Session::InfoRequest(InfoRequestSession::Collecting(intake)) => match intake.awaiting {
                IntakeField::Name => Step::CollectName,
                IntakeField::Year { .. } => Step::CollectYear,
                IntakeField::Id { .. } => Step::CollectId,
            },
            Session::InfoRequest(InfoRequestSession::AwaitingRequirement { .. }) => {
                Step::CollectRequirement
            }
            Session::SelectContactType => Step::SelectContactType,
            Session::ParentContact(ParentContactSession::CollectingCount) => {
                Step::CollectStudentCount
            }
            Session::ParentContact(ParentContactSession::Collecting(intake)) => {
                match intake.awaiting {
                    IntakeField::Name => Step::CollectParentStudentName,
                    IntakeField::Year { .. } => Step::CollectParentStudentYear,
                    IntakeField::Id { .. } => Step::CollectParentStudentId,
                }
            }
            Session::AwaitingHuman(_) => Step::TeamContactRequested,
            Session::Unrecognized => Step::Unrecognized,
        }
    }
}

/// Flat step tag, used for logging and the status census
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Initial,
    ServiceSelection,
    CollectInfoStudentCount,
    CollectName,
    CollectYear,
    CollectId,
    CollectRequirement,
    SelectContactType,
    CollectStudentCount,
    CollectParentStudentName,
    CollectParentStudentYear,
    CollectParentStudentId,
    TeamContactRequested,
    Unrecognized,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Initial => "initial",
            Step::ServiceSelection => "service_selection",
            Step::CollectInfoStudentCount => "collect_info_student_count",
            Step::CollectName => "collect_name",
            Step::CollectYear => "collect_year",
            Step::CollectId => "collect_id",
            Step::CollectRequirement => "collect_requirement",
            Step::SelectContactType => "select_contact_type",
            Step::CollectStudentCount => "collect_student_count",
            Step::CollectParentStudentName => "collect_parent_student_name",
            Step::CollectParentStudentYear => "collect_parent_student_year",
            Step::CollectParentStudentId => "collect_parent_student_id",
            Step::TeamContactRequested => "team_contact_requested",
            Step::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Desk Context
// ============================================================================

/// Keyword tables consulted by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords {
    /// Substrings an operator uses to hand a sender back to the assistant
    pub restart: Vec<String>,
    /// Exact phrase an operator signs off with
    pub agent_sign_off: String,
    /// Substrings that mark a message as a payment proof
    pub receipt: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            restart: ["تم استلام المبلغ", "payment received", "begin", "new", "help"]
                .into_iter()
                .map(String::from)
                .collect(),
            agent_sign_off: "happy to assist. don't hesitate to reach out again if needed."
                .to_string(),
            receipt: [
                "receipt",
                "payment",
                "paid",
                "proof",
                "transaction",
                "transfer",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl Keywords {
    /// Append extra keywords, lowercased and trimmed, skipping blanks and duplicates
    pub fn with_extra(
        mut self,
        restart: impl IntoIterator<Item = String>,
        receipt: impl IntoIterator<Item = String>,
    ) -> Self {
        extend_unique(&mut self.restart, restart);
        extend_unique(&mut self.receipt, receipt);
        self
    }
}

fn extend_unique(list: &mut Vec<String>, extra: impl IntoIterator<Item = String>) {
    for keyword in extra {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !list.contains(&keyword) {
            list.push(keyword);
        }
    }
}

/// Smallest accepted student count
pub const MIN_STUDENTS: u8 = 1;
/// Largest accepted student count
pub const MAX_STUDENTS: u8 = 10;

/// Immutable configuration for the dialogue engine
#[derive(Debug, Clone, Default)]
pub struct DeskContext {
    pub keywords: Keywords,
}

impl DeskContext {
    pub fn new(keywords: Keywords) -> Self {
        Self { keywords }
    }
}
