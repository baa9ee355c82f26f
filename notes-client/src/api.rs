use reqwest::{Response, StatusCode};

use std::time::Duration;

use crate::dto::{DeleteNoteResponse, ErrorResponse, Note, NoteInput};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("{0}")]
    Validation(String),
}

/// The note operations the client needs from the server.
pub trait NotesBackend {
    async fn list(&self) -> Result<Vec<Note>, ClientError>;
    async fn create(&self, input: &NoteInput) -> Result<Note, ClientError>;
    async fn update(&self, id: &str, input: &NoteInput) -> Result<Note, ClientError>;
    async fn delete(&self, id: &str) -> Result<Note, ClientError>;
}

pub struct HttpNotesApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNotesApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn note_url(&self, id: &str) -> String {
        format!("{}/notes/{}", self.base_url, id)
    }
}

// Turns a non-2xx response into a ClientError, preferring the server's `error` field
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    Err(ClientError::Status { status, message })
}

impl NotesBackend for HttpNotesApi {
    async fn list(&self) -> Result<Vec<Note>, ClientError> {
        let url = self.notes_url();
        tracing::debug!("GET {}", url);

        let response = check(self.client.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, input: &NoteInput) -> Result<Note, ClientError> {
        let url = self.notes_url();
        tracing::debug!("POST {}", url);

        let response = check(self.client.post(&url).json(input).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: &str, input: &NoteInput) -> Result<Note, ClientError> {
        let url = self.note_url(id);
        tracing::debug!("PUT {}", url);

        let response = check(self.client.put(&url).json(input).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<Note, ClientError> {
        let url = self.note_url(id);
        tracing::debug!("DELETE {}", url);

        let response = check(self.client.delete(&url).send().await?).await?;
        let body: DeleteNoteResponse = response.json().await?;
        Ok(body.deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_ignore_trailing_slash() {
        let api = HttpNotesApi::new("http://localhost:3000/").unwrap();

        assert_eq!(api.notes_url(), "http://localhost:3000/notes");
        assert_eq!(api.note_url("abc"), "http://localhost:3000/notes/abc");
    }

    #[test]
    fn delete_response_unwraps_deleted_note() {
        let body: DeleteNoteResponse =
            serde_json::from_str(r#"{"deleted":{"id":"1","title":"t","content":"c"}}"#).unwrap();

        assert_eq!(
            body.deleted,
            Note {
                id: "1".to_string(),
                title: "t".to_string(),
                content: "c".to_string(),
            }
        );
    }
}
