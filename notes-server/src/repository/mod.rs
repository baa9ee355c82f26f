use uuid::Uuid;

use crate::models::Note;

const SEED_TITLE: &str = "Welcome";
const SEED_CONTENT: &str = "This is your first note.";

/// Ordered in-memory note storage. Lives for the lifetime of the process.
#[derive(Debug, Default)]
pub struct Repository {
    notes: Vec<Note>,
}

impl Repository {
    pub const fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// Store holding the single note every fresh process starts with.
    pub fn seeded() -> Self {
        let mut repo = Self::new();
        repo.create_note(SEED_TITLE.to_string(), SEED_CONTENT.to_string());
        tracing::info!("Seeded note store with {} note(s)", repo.notes.len());
        repo
    }

    pub fn create_note(&mut self, title: String, content: String) -> Note {
        let note = Note {
            id: self.next_id(),
            title,
            content,
        };

        self.notes.push(note.clone());
        note
    }

    /// Overwrites only the fields that are `Some`.
    pub fn update_note(
        &mut self,
        id: &str,
        title: Option<String>,
        content: Option<String>,
    ) -> Option<Note> {
        let note = self.notes.iter_mut().find(|note| note.id == id)?;

        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }

        Some(note.clone())
    }

    pub fn delete_note(&mut self, id: &str) -> Option<Note> {
        let index = self.notes.iter().position(|note| note.id == id)?;
        Some(self.notes.remove(index))
    }

    pub fn get_one_note(&self, id: &str) -> Option<Note> {
        self.notes.iter().find(|note| note.id == id).cloned()
    }

    pub fn get_all_notes(&self) -> Vec<Note> {
        self.notes.clone()
    }

    // v4 collisions are practically impossible, but ids must stay unique
    fn next_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.notes.iter().any(|note| note.id == id) {
                return id;
            }
        }
    }
}
