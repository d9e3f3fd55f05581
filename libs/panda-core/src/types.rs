//! Core types for note-to-card synchronization.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tags::TagConfig;

/// Identifier of a note in the remote card store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Card extracted from note text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Line where the question tag began (1-indexed, 0 for remote-only cards).
    pub source_line: usize,
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, source_line: usize) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            image: None,
            source_line,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Action required to bring the remote store in line with the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    Add,
    Update,
    Delete,
}

impl CardAction {
    /// Get the action name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// A card paired with the action planned for it.
///
/// For [`CardAction::Delete`] the card carries the remote content, not
/// anything extracted from the note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSyncInfo {
    pub card: Card,
    pub action: CardAction,
    pub deck_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<NoteId>,
}

/// Card already present in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCardEntry {
    pub remote_id: NoteId,
    pub normalized_question: String,
    pub front: String,
    pub back: String,
}

/// Add/update/delete plan for one note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAnalysis {
    pub to_add: Vec<CardSyncInfo>,
    pub to_update: Vec<CardSyncInfo>,
    pub to_delete: Vec<CardSyncInfo>,
    pub total_extracted: usize,
}

impl SyncAnalysis {
    pub fn new(total_extracted: usize) -> Self {
        Self {
            total_extracted,
            ..Self::default()
        }
    }

    /// True when no remote change is needed.
    pub fn is_up_to_date(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// Bridge settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub anki_connect_url: String,
    pub anki_connect_port: u16,
    pub default_deck: String,
    /// Word placed before `::` on a note's first line to pick the deck.
    pub deck_override_word: String,
    pub question_word: String,
    pub answer_word: String,
    pub image_word: String,
    pub note_type: String,
    /// Derive the deck from the note's folder and file name.
    pub use_note_based: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            anki_connect_url: "http://127.0.0.1".to_string(),
            anki_connect_port: 8765,
            default_deck: "Default".to_string(),
            deck_override_word: "Deck".to_string(),
            question_word: TagConfig::DEFAULT_QUESTION.to_string(),
            answer_word: TagConfig::DEFAULT_ANSWER.to_string(),
            image_word: TagConfig::DEFAULT_IMAGE.to_string(),
            note_type: "Basic".to_string(),
            use_note_based: true,
        }
    }
}

impl BridgeSettings {
    /// Tag words for extraction, with blank words replaced by their defaults.
    pub fn tag_config(&self) -> TagConfig {
        fn or_default(word: &str, default: &str) -> String {
            let word = word.trim();
            if word.is_empty() {
                default.to_string()
            } else {
                word.to_string()
            }
        }

        TagConfig {
            question_word: or_default(&self.question_word, TagConfig::DEFAULT_QUESTION),
            answer_word: or_default(&self.answer_word, TagConfig::DEFAULT_ANSWER),
            image_word: or_default(&self.image_word, TagConfig::DEFAULT_IMAGE),
        }
    }
}
