//! reqwest-backed implementation of the API traits.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{paths, ApiEnvelope, EventApi, MentorApi};
use crate::auth::AuthContext;
use crate::config::Config;
use crate::errors::{codes, WorkflowError, WorkflowResult};
use crate::models::{
    MentorProfile, MentorProfileDraft, Mentorship, RespondRequest, Role, SessionUpdateRequest,
};

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Error body shape used by the server on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Authenticated JSON client for the alumni API.
#[derive(Clone, Debug)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    auth: AuthContext,
    upload_timeout: std::time::Duration,
}

impl HttpApiClient {
    pub fn new(config: &Config, auth: AuthContext) -> WorkflowResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(config.api_base_url.trim_end_matches('/')),
            auth,
            upload_timeout: config.upload_timeout,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub(super) fn upload_timeout(&self) -> std::time::Duration {
        self.upload_timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(super) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    async fn get<T>(&self, path: &str) -> WorkflowResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.execute(Method::GET, path, self.request(Method::GET, path))
            .await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> WorkflowResult<Option<T>>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let builder = self.request(method.clone(), path).json(body);
        self.execute(method, path, builder).await
    }

    /// Unwrap the `data` field of the response envelope.
    pub(super) async fn execute<T>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> WorkflowResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        Ok(self.execute_envelope(method, path, builder).await?.data)
    }

    /// Attach auth headers, send, and decode the response envelope.
    ///
    /// Non-2xx statuses and `success: false` bodies become errors; a 401 also drops the
    /// cached token.
    async fn execute_envelope<T>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> WorkflowResult<ApiEnvelope<T>>
    where
        T: DeserializeOwned + Send,
    {
        let token = self.auth.token().await?;
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::debug!(%method, path, %request_id, "Sending API request");

        let response = builder
            .bearer_auth(token)
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            let err = WorkflowError::from_status(status, body.message.or(body.error));
            if err.is_unauthorized() {
                self.auth.invalidate().await;
            }
            tracing::debug!(%method, path, %request_id, status = status.as_u16(), "API request failed");
            return Err(err);
        }

        if text.trim().is_empty() {
            return Ok(ApiEnvelope::default());
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&text)?;
        if envelope.success == Some(false) {
            return Err(WorkflowError::validation(
                envelope
                    .message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ));
        }

        Ok(envelope)
    }
}

impl MentorApi for HttpApiClient {
    async fn my_profile(&self) -> WorkflowResult<Option<MentorProfile>> {
        match self.get(paths::MY_PROFILE).await {
            Ok(profile) => Ok(profile),
            Err(e) if e.code == codes::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_profile(&self, draft: &MentorProfileDraft) -> WorkflowResult<MentorProfile> {
        self.send_json(Method::POST, paths::CREATE_PROFILE, draft)
            .await?
            .ok_or_else(|| WorkflowError::unknown("Create response did not include the profile"))
    }

    async fn edit_profile(
        &self,
        id: &str,
        draft: &MentorProfileDraft,
    ) -> WorkflowResult<MentorProfile> {
        let updated: Option<MentorProfile> = self
            .send_json(Method::PUT, &paths::edit_profile(id), draft)
            .await?;

        Ok(updated.unwrap_or_else(|| MentorProfile {
            id: id.to_string(),
            expertise: draft.expertise.clone(),
            topics: draft.topics.clone(),
            availability: draft.availability.clone(),
            fees: draft.fees,
            available: draft.available,
        }))
    }

    async fn list_mentorships(&self, role: Role) -> WorkflowResult<Vec<Mentorship>> {
        Ok(self
            .get(paths::mentorship_list(role))
            .await?
            .unwrap_or_default())
    }

    async fn respond(&self, id: &str, body: &RespondRequest) -> WorkflowResult<()> {
        self.send_json::<_, serde_json::Value>(Method::PUT, &paths::respond(id), body)
            .await?;
        Ok(())
    }

    async fn update_session(&self, id: &str, body: &SessionUpdateRequest) -> WorkflowResult<()> {
        self.send_json::<_, serde_json::Value>(Method::PUT, &paths::session(id), body)
            .await?;
        Ok(())
    }
}

impl EventApi for HttpApiClient {
    async fn register_for_event(&self, event_id: &str) -> WorkflowResult<String> {
        let path = paths::register_event(event_id);
        let builder = self.request(Method::POST, &path);

        // Only the confirmation message matters; `data` is ignored.
        let envelope: ApiEnvelope<serde_json::Value> =
            self.execute_envelope(Method::POST, &path, builder).await?;

        Ok(envelope
            .message
            .unwrap_or_else(|| "Registered successfully".to_string()))
    }
}
