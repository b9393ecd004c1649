//! REST API module.
//!
//! Declares the endpoints the workflow consumes and the traits the coordinator is
//! written against. `HttpApiClient` is the reqwest-backed implementation.

mod client;
mod upload;

pub use client::*;
pub use upload::*;

use std::future::Future;

use serde::Deserialize;

use crate::errors::WorkflowResult;
use crate::models::{
    MentorProfile, MentorProfileDraft, Mentorship, RespondRequest, Role, SessionUpdateRequest,
};

/// Endpoint paths relative to the configured base URL.
pub mod paths {
    use crate::models::Role;

    pub const MY_PROFILE: &str = "/mentor/my-profile";
    pub const CREATE_PROFILE: &str = "/mentor/create";
    pub const STUDENT_MENTORSHIPS: &str = "/mentor/student/my-mentorships";
    pub const MENTOR_REQUESTS: &str = "/mentor/mentor/requests";
    pub const UPLOAD_PROFILE_PHOTO: &str = "/upload/profile-photo";
    pub const UPLOAD_RESUME: &str = "/upload/resume";

    pub fn edit_profile(id: &str) -> String {
        format!("/mentor/edit/{}", id)
    }

    pub fn respond(id: &str) -> String {
        format!("/mentor/requests/{}/respond", id)
    }

    pub fn session(id: &str) -> String {
        format!("/mentor/mentorships/{}/session", id)
    }

    pub fn register_event(id: &str) -> String {
        format!("/events/{}/register", id)
    }

    /// The authoritative mentorship list for a role.
    pub fn mentorship_list(role: Role) -> &'static str {
        match role {
            Role::Student => STUDENT_MENTORSHIPS,
            Role::Alumni => MENTOR_REQUESTS,
        }
    }
}

/// Response envelope returned by every endpoint. Fields are optional because the
/// server does not always fill them in.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: Option<bool>,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Default for ApiEnvelope<T> {
    fn default() -> Self {
        Self {
            success: None,
            data: None,
            message: None,
        }
    }
}

/// Mentor and mentorship endpoints.
pub trait MentorApi: Send + Sync {
    /// `GET /mentor/my-profile`; `None` when the caller has no profile yet.
    fn my_profile(&self) -> impl Future<Output = WorkflowResult<Option<MentorProfile>>> + Send;

    /// `POST /mentor/create`
    fn create_profile(
        &self,
        draft: &MentorProfileDraft,
    ) -> impl Future<Output = WorkflowResult<MentorProfile>> + Send;

    /// `PUT /mentor/edit/{id}`
    fn edit_profile(
        &self,
        id: &str,
        draft: &MentorProfileDraft,
    ) -> impl Future<Output = WorkflowResult<MentorProfile>> + Send;

    /// `GET /mentor/student/my-mentorships` or `GET /mentor/mentor/requests`.
    fn list_mentorships(
        &self,
        role: Role,
    ) -> impl Future<Output = WorkflowResult<Vec<Mentorship>>> + Send;

    /// `PUT /mentor/requests/{id}/respond`
    fn respond(
        &self,
        id: &str,
        body: &RespondRequest,
    ) -> impl Future<Output = WorkflowResult<()>> + Send;

    /// `PUT /mentor/mentorships/{id}/session`
    fn update_session(
        &self,
        id: &str,
        body: &SessionUpdateRequest,
    ) -> impl Future<Output = WorkflowResult<()>> + Send;
}

/// Event endpoints used by the registration flow.
pub trait EventApi: Send + Sync {
    /// `POST /events/{id}/register`; resolves to the server's confirmation message.
    fn register_for_event(
        &self,
        event_id: &str,
    ) -> impl Future<Output = WorkflowResult<String>> + Send;
}
