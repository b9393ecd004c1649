//! User account model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::WorkflowError;

/// Account type stored on every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Alumni,
    Admin,
    Hod,
    Faculty,
}

impl UserType {
    /// Role this account plays in the mentorship workflow, if any.
    pub fn mentorship_role(&self) -> Option<Role> {
        match self {
            UserType::Student => Some(Role::Student),
            UserType::Alumni => Some(Role::Alumni),
            UserType::Admin | UserType::Hod | UserType::Faculty => None,
        }
    }
}

/// Side of a mentorship the acting user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    /// An alumni user acting as mentor
    Alumni,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Alumni => "alumni",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "alumni" | "mentor" => Ok(Role::Alumni),
            other => Err(WorkflowError::validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Email shape accepted by the alumni portal.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email pattern compiles")
});

/// Digits with an optional leading `+`, after spaces and dashes are removed.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("phone pattern compiles"));

/// An authenticated user account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(alias = "_id", default)]
    pub id: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(regex(path = *EMAIL_PATTERN, message = "Invalid email"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_extra_email"))]
    pub extra_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub user_type: UserType,
    #[serde(default)]
    pub has_completed_profile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    PHONE_PATTERN.is_match(&compact)
}

// An empty optional field counts as not given.
fn validate_extra_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || is_valid_email(email) {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message("Invalid extra email".into()))
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() || is_valid_phone(phone) {
        return Ok(());
    }
    Err(ValidationError::new("phone").with_message("Invalid phone number".into()))
}
