//! Mentorship workflow coordinator.
//!
//! Holds the last server-confirmed list of mentorships for the acting role and runs
//! transitions against the API. Each transition issues exactly one call. Success is
//! followed by a refetch; local status is never patched optimistically.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, PoisonError, RwLock};

use super::state::{self, Transition};
use crate::api::MentorApi;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::models::{
    Mentorship, RespondAction, RespondRequest, Role, SessionDetails, SessionUpdateRequest,
};
use crate::notify::Notifier;

/// Marks a record as busy until dropped.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// Client-side coordinator for one acting user.
pub struct MentorshipCoordinator<A> {
    api: A,
    role: Role,
    notifier: Notifier,
    mentorships: RwLock<Vec<Mentorship>>,
    in_flight: Mutex<HashSet<String>>,
}

impl<A: MentorApi> MentorshipCoordinator<A> {
    pub fn new(api: A, role: Role, notifier: Notifier) -> Self {
        Self {
            api,
            role,
            notifier,
            mentorships: RwLock::new(Vec::new()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Snapshot of the last fetched list.
    pub fn mentorships(&self) -> Vec<Mentorship> {
        self.mentorships
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<Mentorship> {
        self.mentorships
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    /// Whether a transition on `id` is waiting for the server.
    pub fn is_loading(&self, id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Replace the local list with the server's list for this role.
    pub async fn refresh(&self) -> WorkflowResult<Vec<Mentorship>> {
        let fresh = self.api.list_mentorships(self.role).await.map_err(|e| {
            tracing::error!(role = %self.role, error = %e, "Failed to load mentorships");
            e
        })?;

        tracing::debug!(role = %self.role, count = fresh.len(), "Mentorships refreshed");
        *self
            .mentorships
            .write()
            .unwrap_or_else(PoisonError::into_inner) = fresh.clone();
        Ok(fresh)
    }

    /// Accept or reject a pending request. Mentors only.
    pub async fn respond(
        &self,
        id: &str,
        action: RespondAction,
        details: SessionDetails,
    ) -> WorkflowResult<Option<Mentorship>> {
        let body = RespondRequest::new(action, &details);
        self.run(id, action.into(), &details, self.api.respond(id, &body))
            .await
    }

    pub async fn accept(
        &self,
        id: &str,
        details: SessionDetails,
    ) -> WorkflowResult<Option<Mentorship>> {
        self.respond(id, RespondAction::Accept, details).await
    }

    pub async fn reject(
        &self,
        id: &str,
        mentor_notes: Option<String>,
    ) -> WorkflowResult<Option<Mentorship>> {
        let details = SessionDetails {
            mentor_notes,
            ..SessionDetails::default()
        };
        self.respond(id, RespondAction::Reject, details).await
    }

    /// Set the session date, time and notes of an active mentorship.
    pub async fn update_session(
        &self,
        id: &str,
        details: SessionDetails,
    ) -> WorkflowResult<Option<Mentorship>> {
        let body = SessionUpdateRequest::from(&details);
        self.run(
            id,
            Transition::UpdateSession,
            &details,
            self.api.update_session(id, &body),
        )
        .await
    }

    /// Check, guard, call, refetch.
    ///
    /// `call` is not polled unless every local check passes, so a rejected transition
    /// issues no request.
    async fn run<F>(
        &self,
        id: &str,
        transition: Transition,
        details: &SessionDetails,
        call: F,
    ) -> WorkflowResult<Option<Mentorship>>
    where
        F: Future<Output = WorkflowResult<()>>,
    {
        let current = self
            .get(id)
            .ok_or_else(|| WorkflowError::not_found(format!("Mentorship {} not found", id)))?;
        state::next_status(self.role, current.status, transition)?;
        validate_details(transition, details)?;
        let _guard = self.begin(id)?;

        tracing::info!(id, %transition, role = %self.role, from = %current.status, "Applying transition");

        if let Err(e) = call.await {
            tracing::error!(id, %transition, error = %e, "Transition failed");
            self.notifier.failure(id, &e);
            return Err(e);
        }

        tracing::info!(id, %transition, "Transition accepted by server");
        self.notifier.success(id, success_message(transition));

        let fresh = self.refresh().await?;
        Ok(fresh.into_iter().find(|m| m.id == id))
    }

    fn begin(&self, id: &str) -> WorkflowResult<InFlightGuard<'_>> {
        let mut set = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !set.insert(id.to_string()) {
            tracing::warn!(id, "Transition already in progress");
            return Err(WorkflowError::in_flight(id));
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            id: id.to_string(),
        })
    }
}

fn validate_details(transition: Transition, details: &SessionDetails) -> WorkflowResult<()> {
    match transition {
        Transition::UpdateSession => details.validate_schedule(),
        _ => details.validate_pair(),
    }
}

fn success_message(transition: Transition) -> &'static str {
    match transition {
        Transition::Accept => "Mentorship request accepted",
        Transition::Reject => "Mentorship request declined",
        Transition::UpdateSession => "Session details updated",
        Transition::Complete => "Mentorship completed",
        Transition::Cancel => "Mentorship cancelled",
    }
}
