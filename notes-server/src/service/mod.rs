use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    repository::Repository,
};

use std::sync::Arc;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum NoteServiceError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Note not found")]
    NotFound(String),
}

// Absent, null and "" all mean "not provided"
fn provided(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<tokio::sync::Mutex<Repository>>,
}

impl NoteService {
    pub const fn new(repo: Arc<tokio::sync::Mutex<Repository>>) -> Self {
        Self { repo }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        let title = provided(request.title).ok_or(NoteServiceError::MissingTitle)?;
        let content = request.content.unwrap_or_default();

        let note = self.repo.lock().await.create_note(title, content);
        tracing::info!("Created note {}", note.id);

        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        id: &str,
        request: UpdateNoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        let note = self
            .repo
            .lock()
            .await
            .update_note(id, provided(request.title), provided(request.content))
            .ok_or_else(|| NoteServiceError::NotFound(id.to_string()))?;
        tracing::info!("Updated note {}", note.id);

        Ok(note.into())
    }

    pub async fn delete_note(&self, id: &str) -> Result<NoteResponse, NoteServiceError> {
        let note = self
            .repo
            .lock()
            .await
            .delete_note(id)
            .ok_or_else(|| NoteServiceError::NotFound(id.to_string()))?;
        tracing::info!("Deleted note {}", note.id);

        Ok(note.into())
    }

    pub async fn get_one_note(&self, id: &str) -> Result<NoteResponse, NoteServiceError> {
        self.repo
            .lock()
            .await
            .get_one_note(id)
            .map(NoteResponse::from)
            .ok_or_else(|| NoteServiceError::NotFound(id.to_string()))
    }

    pub async fn get_all_notes(&self) -> Vec<NoteResponse> {
        self.repo
            .lock()
            .await
            .get_all_notes()
            .into_iter()
            .map(NoteResponse::from)
            .collect()
    }
}
