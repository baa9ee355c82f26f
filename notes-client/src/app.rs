use reqwest::StatusCode;

use std::{
    fmt::Write,
    time::{Duration, Instant},
};

use crate::{
    api::{ClientError, NotesBackend},
    dto::{Note, NoteInput},
    render,
};

const ERROR_LIFETIME: Duration = Duration::from_secs(5);
const SUCCESS_LIFETIME: Duration = Duration::from_secs(3);

pub const DELETE_QUESTION: &str = "Are you sure you want to delete this note?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// Transient status line, hidden once `expires_at` passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
    pub expires_at: Instant,
}

impl Flash {
    fn success(text: &str) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.to_string(),
            expires_at: Instant::now() + SUCCESS_LIFETIME,
        }
    }

    fn error(text: &str) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.to_string(),
            expires_at: Instant::now() + ERROR_LIFETIME,
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Editing(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub title: String,
    pub content: String,
}

/// Asks the user a yes/no question.
pub trait Confirm {
    async fn confirm(&mut self, question: &str) -> bool;
}

impl Confirm for bool {
    async fn confirm(&mut self, _question: &str) -> bool {
        *self
    }
}

pub struct NotesApp<B> {
    backend: B,
    notes: Vec<Note>,
    loaded: bool,
    mode: Mode,
    pub form: Form,
    flash: Option<Flash>,
}

impl<B: NotesBackend> NotesApp<B> {
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            notes: Vec::new(),
            loaded: false,
            mode: Mode::Idle,
            form: Form {
                title: String::new(),
                content: String::new(),
            },
            flash: None,
        }
    }

    #[cfg(test)]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[cfg(test)]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    #[cfg(test)]
    pub const fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing(_))
    }

    /// Replaces the cache with the server's collection. The prior cache survives a failure.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.backend.list().await {
            Ok(notes) => {
                self.notes = notes;
                self.loaded = true;
                self.flash = None;

                if let Mode::Editing(id) = &self.mode
                    && !self.notes.iter().any(|note| &note.id == id)
                {
                    tracing::info!("Note {} was deleted elsewhere, leaving edit mode", id);
                    self.reset_form();
                }

                Ok(())
            }
            Err(e) => {
                tracing::error!("Error loading notes: {}", e);
                self.flash = Some(Flash::error("Failed to load notes. Please try again."));
                Err(e)
            }
        }
    }

    /// Periodic sync; skipped while a note is being edited. Returns whether a load ran.
    pub async fn refresh(&mut self) -> bool {
        if self.is_editing() {
            tracing::debug!("Skipping refresh while editing");
            return false;
        }

        // failures are already surfaced as a flash
        let _ = self.load().await;
        true
    }

    pub async fn submit(&mut self, title: &str, content: &str) -> Result<(), ClientError> {
        let input = NoteInput {
            title: title.trim().to_string(),
            content: content.trim().to_string(),
        };

        if input.title.is_empty() || input.content.is_empty() {
            let message = "Please fill in both title and content.";
            self.flash = Some(Flash::error(message));
            return Err(ClientError::Validation(message.to_string()));
        }

        match self.mode.clone() {
            Mode::Editing(id) => self.update(&id, &input).await,
            Mode::Idle => self.create(&input).await,
        }
    }

    async fn create(&mut self, input: &NoteInput) -> Result<(), ClientError> {
        match self.backend.create(input).await {
            Ok(note) => {
                self.notes.push(note);
                self.reset_form();
                self.flash = Some(Flash::success("Note created successfully!"));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error creating note: {}", e);
                self.flash = Some(Flash::error("Failed to create note. Please try again."));
                Err(e)
            }
        }
    }

    async fn update(&mut self, id: &str, input: &NoteInput) -> Result<(), ClientError> {
        match self.backend.update(id, input).await {
            Ok(updated) => {
                if let Some(note) = self.notes.iter_mut().find(|note| note.id == id) {
                    *note = updated;
                }
                self.reset_form();
                self.flash = Some(Flash::success("Note updated successfully!"));
                Ok(())
            }
            Err(ClientError::Status { status, message }) if status == StatusCode::NOT_FOUND => {
                tracing::warn!("Note {} no longer exists on the server", id);
                self.notes.retain(|note| note.id != id);
                self.reset_form();
                self.flash = Some(Flash::error("This note was deleted elsewhere."));
                Err(ClientError::Status { status, message })
            }
            Err(e) => {
                tracing::error!("Error updating note: {}", e);
                self.flash = Some(Flash::error("Failed to update note. Please try again."));
                Err(e)
            }
        }
    }

    /// Loads a cached note into the form. Returns false for an unknown id.
    pub fn edit(&mut self, id: &str) -> bool {
        let Some(note) = self.notes.iter().find(|note| note.id == id) else {
            return false;
        };

        self.form = Form {
            title: note.title.clone(),
            content: note.content.clone(),
        };
        self.mode = Mode::Editing(note.id.clone());
        true
    }

    pub fn cancel(&mut self) {
        self.reset_form();
        self.flash = None;
    }

    pub async fn remove(&mut self, id: &str, confirm: &mut impl Confirm) -> Result<(), ClientError> {
        if !confirm.confirm(DELETE_QUESTION).await {
            return Ok(());
        }

        match self.backend.delete(id).await {
            Ok(_) => {
                self.forget(id);
                self.flash = Some(Flash::success("Note deleted successfully!"));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error deleting note: {}", e);
                if matches!(&e, ClientError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
                {
                    self.forget(id);
                }
                self.flash = Some(Flash::error("Failed to delete note. Please try again."));
                Err(e)
            }
        }
    }

    /// Accepts a full id, a `#n`/`n` index into the rendered list, or a unique id prefix.
    pub fn resolve(&self, token: &str) -> Option<String> {
        let token = token.trim();

        if let Ok(index) = token.trim_start_matches('#').parse::<usize>()
            && let Some(note) = index.checked_sub(1).and_then(|i| self.notes.get(i))
        {
            return Some(note.id.clone());
        }

        if let Some(note) = self.notes.iter().find(|note| note.id == token) {
            return Some(note.id.clone());
        }

        let mut matches = self.notes.iter().filter(|note| note.id.starts_with(token));
        match (matches.next(), matches.next()) {
            (Some(note), None) if !token.is_empty() => Some(note.id.clone()),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        self.render_at(Instant::now())
    }

    pub fn render_at(&self, now: Instant) -> String {
        let mut out = String::new();

        let heading = match self.mode {
            Mode::Idle => "Add New Note",
            Mode::Editing(_) => "Edit Note",
        };
        let _ = writeln!(out, "== {heading} ==");
        let _ = writeln!(out, "  title:   {}", self.form.title);
        let _ = writeln!(out, "  content: {}", self.form.content);

        if let Some(flash) = self.flash.as_ref().filter(|flash| flash.is_visible(now)) {
            let tag = match flash.kind {
                FlashKind::Success => "ok",
                FlashKind::Error => "error",
            };
            let _ = writeln!(out, "[{tag}] {}", flash.text);
        }

        let _ = writeln!(out);
        let _ = write!(out, "{}", render::notes(&self.notes, self.loaded));
        out
    }

    fn forget(&mut self, id: &str) {
        self.notes.retain(|note| note.id != id);
        if self.mode == Mode::Editing(id.to_string()) {
            self.reset_form();
        }
    }

    fn reset_form(&mut self) {
        self.mode = Mode::Idle;
        self.form = Form::default();
    }
}
