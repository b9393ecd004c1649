//! Multipart file uploads (profile photo, resume).

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{paths, HttpApiClient};
use crate::errors::{WorkflowError, WorkflowResult};
use crate::tasks::CancelToken;

/// What is being uploaded; selects the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    ProfilePhoto,
    Resume,
}

impl UploadKind {
    pub fn path(&self) -> &'static str {
        match self {
            UploadKind::ProfilePhoto => paths::UPLOAD_PROFILE_PHOTO,
            UploadKind::Resume => paths::UPLOAD_RESUME,
        }
    }
}

/// Location of a stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
}

impl HttpApiClient {
    /// Upload a file, aborting after the configured upload timeout or when `cancel` fires.
    pub async fn upload_file(
        &self,
        kind: UploadKind,
        file_name: &str,
        bytes: Vec<u8>,
        cancel: CancelToken,
    ) -> WorkflowResult<UploadedFile> {
        let timeout = self.upload_timeout();
        let path = kind.path();

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let builder = self
            .request(Method::POST, path)
            .timeout(timeout)
            .multipart(Form::new().part("file", part));

        tracing::info!(?kind, file_name, "Uploading file");

        let uploaded: Option<UploadedFile> = tokio::select! {
            result = self.execute(Method::POST, path, builder) => result?,
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!(?kind, file_name, "Upload timed out after {:?}", timeout);
                return Err(WorkflowError::timeout(format!(
                    "Upload did not finish within {} seconds",
                    timeout.as_secs()
                )));
            }
            _ = cancel.cancelled() => {
                tracing::info!(?kind, file_name, "Upload cancelled");
                return Err(WorkflowError::cancelled("Upload cancelled"));
            }
        };

        uploaded.ok_or_else(|| WorkflowError::unknown("Upload response did not include a URL"))
    }
}
