//! Mentor profile editor.
//!
//! Whether a submit creates or edits is fixed by `EditorMode`, decided once when the
//! editor is built.

use validator::Validate;

use crate::api::MentorApi;
use crate::errors::WorkflowResult;
use crate::models::{MentorProfile, MentorProfileDraft};
use crate::notify::Notifier;

/// What a submit will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(String),
}

/// Draft state for the signed-in alumni's mentor profile.
///
/// The only way to build one is [`MentorProfileEditor::load`], which asks the server
/// whether a profile exists. The mode cannot be chosen by the caller:
///
/// ```compile_fail
/// use alumni_mentorship::{HttpApiClient, MentorProfileEditor, Notifier};
///
/// fn force_create(client: &HttpApiClient) {
///     let _ = MentorProfileEditor::for_create(client, Notifier::default());
/// }
/// ```
pub struct MentorProfileEditor<'a, A> {
    api: &'a A,
    notifier: Notifier,
    mode: EditorMode,
    /// Form state; mutate freely before calling `submit`.
    pub draft: MentorProfileDraft,
}

impl<'a, A: MentorApi> MentorProfileEditor<'a, A> {
    /// Editor for a user with no profile yet.
    fn for_create(api: &'a A, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            mode: EditorMode::Create,
            draft: MentorProfileDraft::default(),
        }
    }

    /// Editor for an existing profile, prefilled from it.
    fn for_edit(api: &'a A, notifier: Notifier, profile: &MentorProfile) -> Self {
        Self {
            api,
            notifier,
            mode: EditorMode::Edit(profile.id.clone()),
            draft: MentorProfileDraft::from(profile),
        }
    }

    /// Fetch the caller's profile and build the matching editor.
    pub async fn load(api: &'a A, notifier: Notifier) -> WorkflowResult<Self> {
        let editor = match api.my_profile().await? {
            Some(profile) => {
                tracing::debug!(profile = %profile.id, "Editing existing mentor profile");
                Self::for_edit(api, notifier, &profile)
            }
            None => {
                tracing::debug!("No mentor profile yet, editor will create one");
                Self::for_create(api, notifier)
            }
        };
        Ok(editor)
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Validate and save the draft.
    ///
    /// Create mode calls the create endpoint and switches to edit mode for the new id.
    /// Edit mode calls the edit endpoint for its id.
    pub async fn submit(&mut self) -> WorkflowResult<MentorProfile> {
        self.draft.validate()?;

        let result = match &self.mode {
            EditorMode::Create => self.api.create_profile(&self.draft).await,
            EditorMode::Edit(id) => self.api.edit_profile(id, &self.draft).await,
        };

        match result {
            Ok(profile) => {
                let message = match self.mode {
                    EditorMode::Create => "Mentor profile created",
                    EditorMode::Edit(_) => "Mentor profile updated",
                };
                tracing::info!(profile = %profile.id, "{}", message);
                self.notifier.success(&profile.id, message);
                self.mode = EditorMode::Edit(profile.id.clone());
                Ok(profile)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save mentor profile");
                self.notifier.failure("mentor-profile", &e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::errors::WorkflowError;
    use crate::models::{
        DayKey, Mentorship, RespondRequest, Role, SessionUpdateRequest, TimeWindow,
    };

    #[derive(Default)]
    struct ProfileApi {
        existing: Option<MentorProfile>,
        calls: Mutex<Vec<String>>,
    }

    impl ProfileApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MentorApi for ProfileApi {
        async fn my_profile(&self) -> WorkflowResult<Option<MentorProfile>> {
            Ok(self.existing.clone())
        }

        async fn create_profile(&self, draft: &MentorProfileDraft) -> WorkflowResult<MentorProfile> {
            self.calls.lock().unwrap().push("create".to_string());
            Ok(profile("new-id", draft))
        }

        async fn edit_profile(
            &self,
            id: &str,
            draft: &MentorProfileDraft,
        ) -> WorkflowResult<MentorProfile> {
            self.calls.lock().unwrap().push(format!("edit:{}", id));
            Ok(profile(id, draft))
        }

        async fn list_mentorships(&self, _: Role) -> WorkflowResult<Vec<Mentorship>> {
            Ok(Vec::new())
        }

        async fn respond(&self, _: &str, _: &RespondRequest) -> WorkflowResult<()> {
            Err(WorkflowError::unknown("unused"))
        }

        async fn update_session(&self, _: &str, _: &SessionUpdateRequest) -> WorkflowResult<()> {
            Err(WorkflowError::unknown("unused"))
        }
    }

    fn profile(id: &str, draft: &MentorProfileDraft) -> MentorProfile {
        MentorProfile {
            id: id.to_string(),
            expertise: draft.expertise.clone(),
            topics: draft.topics.clone(),
            availability: draft.availability.clone(),
            fees: draft.fees,
            available: draft.available,
        }
    }

    fn filled_draft() -> MentorProfileDraft {
        let mut draft = MentorProfileDraft {
            expertise: "Backend engineering".to_string(),
            ..MentorProfileDraft::default()
        };
        draft.add_topic("System design").unwrap();
        draft
            .availability
            .add_window(DayKey::Saturday, TimeWindow::new("10:00", "12:00"));
        draft
    }

    #[tokio::test]
    async fn test_no_profile_creates_then_edits() {
        let api = ProfileApi::default();
        let mut editor = MentorProfileEditor::load(&api, Notifier::default())
            .await
            .unwrap();
        assert_eq!(editor.mode(), &EditorMode::Create);

        editor.draft = filled_draft();
        editor.submit().await.unwrap();
        assert_eq!(editor.mode(), &EditorMode::Edit("new-id".to_string()));

        editor.draft.fees = 10.0;
        editor.submit().await.unwrap();

        assert_eq!(api.calls(), vec!["create", "edit:new-id"]);
    }

    #[tokio::test]
    async fn test_existing_profile_always_edits_its_id() {
        let api = ProfileApi {
            existing: Some(profile("p-7", &filled_draft())),
            ..ProfileApi::default()
        };
        let mut editor = MentorProfileEditor::load(&api, Notifier::default())
            .await
            .unwrap();

        assert_eq!(editor.mode(), &EditorMode::Edit("p-7".to_string()));
        assert_eq!(editor.draft.topics, vec!["System design".to_string()]);

        editor.submit().await.unwrap();
        assert_eq!(api.calls(), vec!["edit:p-7"]);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_submitted() {
        let api = ProfileApi::default();
        let mut editor = MentorProfileEditor::for_create(&api, Notifier::default());
        editor.draft = filled_draft();
        editor
            .draft
            .availability
            .add_window(DayKey::Monday, TimeWindow::new("18:00", "08:00"));

        assert!(editor.submit().await.is_err());
        assert!(api.calls().is_empty());
        assert_eq!(editor.mode(), &EditorMode::Create);
    }
}
