//! Deck-name resolution for a note.

use regex::RegexBuilder;

use crate::types::BridgeSettings;

/// Separator between parent and child decks in the remote store.
pub const DECK_SEPARATOR: &str = "::";

/// Resolve the target deck for a note.
///
/// A first line of the form `Deck:: Languages/Spanish` wins over everything
/// else. Otherwise, with note-based decks enabled, the note path
/// `folder/sub/Note.md` maps to `folder/sub::Note`.
///
/// E.g., "rust/ownership.md" -> "rust::ownership"
/// E.g., "single.md" -> "single"
pub fn resolve_deck_name(
    settings: &BridgeSettings,
    note_path: Option<&str>,
    note_content: Option<&str>,
) -> String {
    if let Some(deck) = note_content.and_then(|c| deck_override(&settings.deck_override_word, c)) {
        return deck;
    }

    match note_path {
        Some(path) if settings.use_note_based => deck_from_path(path),
        _ => settings.default_deck.clone(),
    }
}

/// Deck named on the note's first line, if any.
pub fn deck_override(word: &str, content: &str) -> Option<String> {
    if word.trim().is_empty() {
        return None;
    }

    let first_line = content.lines().next().unwrap_or_default();
    let re = RegexBuilder::new(&format!(r"^{}::\s*(.+)$", regex::escape(word)))
        .case_insensitive(true)
        .build()
        .ok()?;

    let deck = re.captures(first_line)?.get(1)?.as_str().trim();
    if deck.is_empty() {
        None
    } else {
        Some(deck.replace('/', DECK_SEPARATOR))
    }
}

fn deck_from_path(path: &str) -> String {
    let (folder, file_name) = match path.rsplit_once('/') {
        Some((folder, file_name)) => (folder, file_name),
        None => ("", path),
    };

    let note_name = file_name.strip_suffix(".md").unwrap_or(file_name);
    let note_name = if note_name.is_empty() { "Unknown" } else { note_name };

    if folder.is_empty() {
        note_name.to_string()
    } else {
        format!("{folder}{DECK_SEPARATOR}{note_name}")
    }
}
