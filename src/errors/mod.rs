//! Error handling module for the mentorship client.
//!
//! Every workflow operation returns `Result<T, WorkflowError>`, so the presentation layer
//! only ever has to deal with one error shape.

use std::fmt;

use reqwest::StatusCode;
use validator::ValidationErrors;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
    pub const IN_FLIGHT: &str = "IN_FLIGHT";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const CANCELLED: &str = "CANCELLED";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const UNKNOWN: &str = "UNKNOWN";
}

/// Broad error category surfaced to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, expired or rejected bearer token
    Unauthorized,
    /// Input rejected locally or by the server
    Validation,
    /// Transport failure, timeout or abort
    Network,
    /// Anything else
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Validation => "validation",
            ErrorKind::Network => "network",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// Unified error returned by every workflow operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowError {
    pub kind: ErrorKind,
    pub code: &'static str,
    pub message: String,
}

impl WorkflowError {
    pub fn new(kind: ErrorKind, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, codes::UNAUTHORIZED, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, codes::VALIDATION_ERROR, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, codes::NOT_FOUND, message)
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, codes::INVALID_TRANSITION, message)
    }

    pub fn in_flight(id: &str) -> Self {
        Self::new(
            ErrorKind::Validation,
            codes::IN_FLIGHT,
            format!("A request for {} is already in progress", id),
        )
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, codes::NETWORK_ERROR, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, codes::TIMEOUT, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, codes::CANCELLED, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, codes::UNKNOWN, message)
    }

    /// Map a non-success HTTP status (and the server's message, if any) to an error.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED => Self::unauthorized(message),
            StatusCode::NOT_FOUND => Self::not_found(message),
            StatusCode::BAD_REQUEST
            | StatusCode::FORBIDDEN
            | StatusCode::CONFLICT
            | StatusCode::UNPROCESSABLE_ENTITY => Self::validation(message),
            s if s.is_server_error() => {
                Self::new(ErrorKind::Unknown, codes::SERVER_ERROR, message)
            }
            _ => Self::unknown(message),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for WorkflowError {}

impl From<reqwest::Error> for WorkflowError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            tracing::warn!("Request timed out: {:?}", err);
            return WorkflowError::timeout(format!("Request timed out: {}", err));
        }
        if err.is_decode() {
            tracing::error!("Response decode error: {:?}", err);
            return WorkflowError::new(
                ErrorKind::Unknown,
                codes::DECODE_ERROR,
                format!("Invalid response body: {}", err),
            );
        }
        if let Some(status) = err.status() {
            return WorkflowError::from_status(status, None);
        }
        tracing::error!("Network error: {:?}", err);
        WorkflowError::network(format!("Network error: {}", err))
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        WorkflowError::new(
            ErrorKind::Unknown,
            codes::DECODE_ERROR,
            format!("JSON error: {}", err),
        )
    }
}

impl From<std::io::Error> for WorkflowError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("IO error: {:?}", err);
        WorkflowError::new(ErrorKind::Unknown, codes::IO_ERROR, format!("IO error: {}", err))
    }
}

impl From<ValidationErrors> for WorkflowError {
    fn from(errors: ValidationErrors) -> Self {
        // Sorted so the combined message does not depend on map order.
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        tracing::debug!("Validation failed: {:?}", messages);
        WorkflowError::validation(messages.join("; "))
    }
}

/// Result alias used across the crate.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = WorkflowError::from_status(StatusCode::UNAUTHORIZED, None);
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.code, codes::UNAUTHORIZED);

        let err = WorkflowError::from_status(StatusCode::BAD_REQUEST, Some("bad date".into()));
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "bad date");

        let err = WorkflowError::from_status(StatusCode::NOT_FOUND, None);
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.code, codes::NOT_FOUND);

        let err = WorkflowError::from_status(StatusCode::BAD_GATEWAY, None);
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.code, codes::SERVER_ERROR);
    }

    #[test]
    fn test_display_includes_code() {
        let err = WorkflowError::in_flight("42");
        assert_eq!(err.to_string(), "IN_FLIGHT: A request for 42 is already in progress");
    }

    #[test]
    fn test_validation_errors_are_joined_in_order() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "name",
            validator::ValidationError::new("length").with_message("Name is required".into()),
        );
        errors.add("phone", validator::ValidationError::new("phone"));

        let err = WorkflowError::from(errors);
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Name is required; phone is invalid");
    }

    #[test]
    fn test_json_error_is_unknown() {
        let err: WorkflowError = serde_json::from_str::<i32>("nope").unwrap_err().into();
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.code, codes::DECODE_ERROR);
    }
}
