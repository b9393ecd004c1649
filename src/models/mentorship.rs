//! Mentorship model and the request bodies of its transitions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{WorkflowError, WorkflowResult};

/// Lifecycle status of a mentorship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorshipStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl MentorshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentorshipStatus::Pending => "pending",
            MentorshipStatus::Active => "active",
            MentorshipStatus::Completed => "completed",
            MentorshipStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MentorshipStatus::Completed | MentorshipStatus::Cancelled
        )
    }
}

impl fmt::Display for MentorshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal view of the other party, as populated by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Participant {
    #[serde(alias = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A mentorship between one student and one mentor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mentorship {
    #[serde(alias = "_id")]
    pub id: String,
    pub status: MentorshipStatus,
    #[serde(default)]
    pub request_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub session_date: Option<String>,
    #[serde(default)]
    pub session_time: Option<String>,
    #[serde(default)]
    pub mentor_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<Participant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentor: Option<Participant>,
}

/// Mentor's answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondAction {
    Accept,
    Reject,
}

/// Optional session details supplied with a transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDetails {
    pub session_date: Option<String>,
    pub session_time: Option<String>,
    pub mentor_notes: Option<String>,
}

impl SessionDetails {
    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            mentor_notes: Some(notes.into()),
            ..Self::default()
        }
    }

    pub fn scheduled(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            session_date: Some(date.into()),
            session_time: Some(time.into()),
            mentor_notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.mentor_notes = Some(notes.into());
        self
    }

    fn date(&self) -> &str {
        present(&self.session_date)
    }

    fn time(&self) -> &str {
        present(&self.session_time)
    }

    /// A date/time pair must be given together or not at all.
    pub fn validate_pair(&self) -> WorkflowResult<()> {
        match (self.date().is_empty(), self.time().is_empty()) {
            (true, false) => Err(WorkflowError::validation("Session date is required")),
            (false, true) => Err(WorkflowError::validation("Session time is required")),
            _ => Ok(()),
        }
    }

    /// Scheduling a session needs both a date and a time.
    pub fn validate_schedule(&self) -> WorkflowResult<()> {
        self.validate_pair()?;
        if self.date().is_empty() {
            return Err(WorkflowError::validation(
                "Session date and time are required",
            ));
        }
        Ok(())
    }
}

fn present(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}

/// Body of `PUT /mentor/requests/{id}/respond`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondRequest {
    pub action: RespondAction,
    pub mentor_notes: String,
    pub session_date: String,
    pub session_time: String,
}

impl RespondRequest {
    pub fn new(action: RespondAction, details: &SessionDetails) -> Self {
        Self {
            action,
            mentor_notes: present(&details.mentor_notes).to_string(),
            session_date: details.date().to_string(),
            session_time: details.time().to_string(),
        }
    }
}

/// Body of `PUT /mentor/mentorships/{id}/session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdateRequest {
    pub session_date: String,
    pub session_time: String,
    pub mentor_notes: String,
}

impl From<&SessionDetails> for SessionUpdateRequest {
    fn from(details: &SessionDetails) -> Self {
        Self {
            session_date: details.date().to_string(),
            session_time: details.time().to_string(),
            mentor_notes: present(&details.mentor_notes).to_string(),
        }
    }
}
