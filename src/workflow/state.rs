//! Mentorship lifecycle rules.
//!
//! `pending -> {active, cancelled}`, `active -> {completed, cancelled}`. Completed and
//! cancelled are terminal.

use std::fmt;

use crate::errors::{WorkflowError, WorkflowResult};
use crate::models::{MentorshipStatus, RespondAction, Role};

/// An action a participant can take on a mentorship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Accept,
    Reject,
    UpdateSession,
    Complete,
    Cancel,
}

impl Transition {
    pub const ALL: [Transition; 5] = [
        Transition::Accept,
        Transition::Reject,
        Transition::UpdateSession,
        Transition::Complete,
        Transition::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Accept => "accept",
            Transition::Reject => "reject",
            Transition::UpdateSession => "update_session",
            Transition::Complete => "complete",
            Transition::Cancel => "cancel",
        }
    }
}

impl From<RespondAction> for Transition {
    fn from(action: RespondAction) -> Self {
        match action {
            RespondAction::Accept => Transition::Accept,
            RespondAction::Reject => Transition::Reject,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status after `role` applies `transition` to a mentorship in `from`.
pub fn next_status(
    role: Role,
    from: MentorshipStatus,
    transition: Transition,
) -> WorkflowResult<MentorshipStatus> {
    use crate::models::MentorshipStatus::*;

    let next = match (transition, role, from) {
        (Transition::Accept, Role::Alumni, Pending) => Some(Active),
        (Transition::Reject, Role::Alumni, Pending) => Some(Cancelled),
        (Transition::UpdateSession, _, Active) => Some(Active),
        (Transition::Complete, Role::Alumni, Active) => Some(Completed),
        (Transition::Cancel, _, Active) => Some(Cancelled),
        _ => None,
    };

    next.ok_or_else(|| {
        WorkflowError::invalid_transition(format!(
            "A {} cannot {} a {} mentorship",
            role, transition, from
        ))
    })
}

/// Transitions `role` may apply to a mentorship in `status`.
pub fn allowed_transitions(role: Role, status: MentorshipStatus) -> Vec<Transition> {
    Transition::ALL
        .into_iter()
        .filter(|t| next_status(role, status, *t).is_ok())
        .collect()
}
