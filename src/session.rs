//! Client session state: staged attachments, style selection, submission
//! lifecycle, and the cached history list.
//!
//! One `SessionState` lives for one user session and is handed by reference
//! to whatever drives it; nothing here is a global. The history cache is
//! never the source of truth: every mutating store call that succeeds is
//! followed by exactly one wholesale refetch, and a failed call leaves the
//! cache at its last known-good snapshot.

use tracing::{debug, warn};

use crate::service::{AnalysisService, HistoryStore, ServiceError};
use crate::styles::StyleSelection;
use crate::types::{
    AnalysisResult, HistoryRecord, ImageAttachment, IncomingFile, SubmissionPayload,
};

/// Where one submission currently stands. `Submitting` is only left through
/// `complete_submission` or `fail_submission`; a new submission can begin
/// from any other phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Errors surfaced by session operations. The validation variants are
/// detected before any network call and mutate nothing; `Service` carries a
/// collaborator failure through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no images selected")]
    NoAttachments,

    #[error("no analysis style selected")]
    NoStyles,

    #[error("new name must not be empty")]
    EmptyRenameTarget,

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Default)]
pub struct SessionState {
    attachments: Vec<ImageAttachment>,
    style_keys: Vec<String>,
    context: String,
    display_name: String,
    phase: SubmissionPhase,
    history: Vec<HistoryRecord>,
    next_attachment_id: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage every image in the batch, in the order supplied. Non-image
    /// entries are dropped here; warning the user when a whole batch was
    /// rejected is the caller's job. Returns the accepted count.
    pub fn add_attachments(&mut self, files: Vec<IncomingFile>) -> usize {
        let mut accepted = 0;
        for file in files {
            if !file.is_image() {
                warn!(name = %file.name, mime_type = %file.mime_type, "dropping non-image file");
                continue;
            }
            let id = format!("att-{}", self.next_attachment_id);
            self.next_attachment_id += 1;
            self.attachments.push(ImageAttachment {
                id,
                bytes: file.bytes,
                mime_type: file.mime_type,
            });
            accepted += 1;
        }
        accepted
    }

    /// Remove by position. Out-of-bounds is a no-op returning false.
    pub fn remove_attachment(&mut self, index: usize) -> bool {
        if index >= self.attachments.len() {
            return false;
        }
        self.attachments.remove(index);
        true
    }

    /// Replace the active style set with the selection's composite keys.
    pub fn set_style_selection(&mut self, selection: &StyleSelection) {
        self.style_keys = selection.composite_keys();
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    pub fn attachments(&self) -> &[ImageAttachment] {
        &self.attachments
    }

    pub fn style_keys(&self) -> &[String] {
        &self.style_keys
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// Validate staged input, reject if a submission is already in flight,
    /// and capture the payload snapshot synchronously. Once this returns,
    /// further session mutations cannot reach the captured payload.
    pub fn begin_submission(&mut self) -> Result<SubmissionPayload, SessionError> {
        if self.phase == SubmissionPhase::Submitting {
            return Err(SessionError::SubmissionInFlight);
        }
        if self.attachments.is_empty() {
            return Err(SessionError::NoAttachments);
        }
        if self.style_keys.is_empty() {
            return Err(SessionError::NoStyles);
        }
        self.phase = SubmissionPhase::Submitting;
        Ok(SubmissionPayload {
            attachments: self.attachments.clone(),
            styles: self.style_keys.clone(),
            context: self.context.clone(),
            display_name: self.display_name.clone(),
        })
    }

    pub fn complete_submission(&mut self) {
        self.phase = SubmissionPhase::Succeeded;
    }

    pub fn fail_submission(&mut self) {
        self.phase = SubmissionPhase::Failed;
    }

    /// One full submit: validate, snapshot, call the service, record the
    /// outcome. Staged input survives both outcomes so a failed submission
    /// loses nothing; `reset` is the only thing that clears it.
    pub async fn submit(
        &mut self,
        service: &(dyn AnalysisService + Sync),
    ) -> Result<Vec<AnalysisResult>, SessionError> {
        let payload = self.begin_submission()?;
        match service.analyze(&payload).await {
            Ok(analyses) => {
                self.complete_submission();
                Ok(analyses)
            }
            Err(err) => {
                self.fail_submission();
                Err(err.into())
            }
        }
    }

    /// Clear staged input and the submission phase. Idempotent. The history
    /// cache is left alone; it tracks the remote store, not this session's
    /// inputs.
    pub fn reset(&mut self) {
        self.attachments.clear();
        self.style_keys.clear();
        self.context.clear();
        self.display_name.clear();
        self.phase = SubmissionPhase::Idle;
    }

    /// Refetch the authoritative history list and replace the cache
    /// wholesale. On failure the previous snapshot stays untouched.
    pub async fn refresh_history(
        &mut self,
        store: &(dyn HistoryStore + Sync),
    ) -> Result<(), SessionError> {
        let records = store.list().await?;
        debug!(count = records.len(), "replacing history cache");
        self.history = records;
        Ok(())
    }

    /// Rename a record in the remote store, then refetch. The empty-name
    /// check runs before any network call.
    pub async fn rename_history_record(
        &mut self,
        store: &(dyn HistoryStore + Sync),
        id: &str,
        new_name: &str,
    ) -> Result<(), SessionError> {
        if new_name.trim().is_empty() {
            return Err(SessionError::EmptyRenameTarget);
        }
        store.rename(id, new_name).await?;
        self.refresh_history(store).await
    }

    /// Delete a record in the remote store, then refetch.
    pub async fn delete_history_record(
        &mut self,
        store: &(dyn HistoryStore + Sync),
        id: &str,
    ) -> Result<(), SessionError> {
        store.delete(id).await?;
        self.refresh_history(store).await
    }
}
