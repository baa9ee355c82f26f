use std::fmt::Write;

use crate::dto::Note;

pub const TRUNCATE_AT: usize = 150;
pub const EMPTY_MESSAGE: &str = "No notes yet. Create your first note above!";
pub const LOADING_MESSAGE: &str = "Loading notes...";

/// Cuts `content` to `TRUNCATE_AT` characters, appending "..." when anything was dropped.
pub fn truncate(content: &str) -> String {
    match content.char_indices().nth(TRUNCATE_AT) {
        Some((end, _)) => format!("{}...", &content[..end]),
        None => content.to_string(),
    }
}

pub fn note_card(index: usize, note: &Note) -> String {
    let mut card = String::new();
    let _ = writeln!(card, "[#{index}] {}", note.title);
    for line in truncate(&note.content).lines() {
        let _ = writeln!(card, "    {line}");
    }
    let _ = write!(card, "    {}  [edit #{index}] [delete #{index}]", note.id);
    card
}

pub fn notes(notes: &[Note], loaded: bool) -> String {
    if notes.is_empty() {
        return if loaded { EMPTY_MESSAGE } else { LOADING_MESSAGE }.to_string();
    }

    notes
        .iter()
        .enumerate()
        .map(|(i, note)| note_card(i + 1, note))
        .collect::<Vec<_>>()
        .join("\n\n")
}
