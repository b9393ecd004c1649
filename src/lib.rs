//! Alumni Mentorship Client
//!
//! Client-side workflow for the alumni network's mentorship feature: mentor profiles,
//! request accept/reject, and session scheduling against the alumni REST API.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod notify;
pub mod registration;
pub mod tasks;
pub mod workflow;

pub use api::{EventApi, HttpApiClient, MentorApi};
pub use auth::{AuthContext, FileTokenStore, StaticToken, TokenSource};
pub use config::Config;
pub use errors::{ErrorKind, WorkflowError, WorkflowResult};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use workflow::{EditorMode, MentorProfileEditor, MentorshipCoordinator};
