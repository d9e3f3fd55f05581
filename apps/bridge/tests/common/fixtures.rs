//! Note content fixtures.

use panda_bridge::sync::NoteSource;

/// Path used for most notes; resolves to deck `bio::Cells`.
pub const CELLS_PATH: &str = "bio/Cells.md";
pub const CELLS_DECK: &str = "bio::Cells";

/// Note with `num_cards` single-line cards.
pub fn sample_note_content(num_cards: usize) -> String {
    (0..num_cards)
        .map(|i| format!("Q: Question {}? A: Answer {}.", i + 1, i + 1))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn cells_note(content: &str) -> NoteSource {
    NoteSource::new(CELLS_PATH, content)
}
