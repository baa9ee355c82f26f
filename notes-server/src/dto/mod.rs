use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Note;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Note ID
    pub id: String,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Note title, required and non-empty
    #[serde(default)]
    pub title: Option<String>,
    /// Note content, empty when omitted
    #[serde(default)]
    pub content: Option<String>,
}

/// Fields that are omitted, null or empty keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    /// New note title
    #[serde(default)]
    pub title: Option<String>,
    /// New note content
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteNoteResponse {
    /// The removed note
    pub deleted: NoteResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
