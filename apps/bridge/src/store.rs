//! Remote card store abstraction.

use async_trait::async_trait;
use panda_core::NoteId;

use crate::error::StoreError;

/// Tag marking notes created by the bridge.
pub const PLUGIN_TAG: &str = "panda-bridge";

/// Tags attached to every note the bridge creates.
pub const NOTE_TAGS: [&str; 2] = [PLUGIN_TAG, "obsidian"];

/// Front/back content of a remote note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteNote {
    pub id: NoteId,
    pub front: String,
    pub back: String,
}

/// Capability offered by a remote card store such as AnkiConnect.
#[async_trait]
pub trait RemoteCardStore: Send + Sync {
    /// Whether the store is reachable and speaks a supported version.
    async fn test_connection(&self) -> bool;

    async fn find_cards(&self, query: &str) -> Result<Vec<NoteId>, StoreError>;

    async fn fetch_card_details(&self, ids: &[NoteId]) -> Result<Vec<RemoteNote>, StoreError>;

    /// Create a note; a duplicate rejection is [`StoreError::Duplicate`].
    async fn create_card(
        &self,
        deck: &str,
        front: &str,
        back: &str,
        tags: &[&str],
    ) -> Result<NoteId, StoreError>;

    async fn update_card_fields(&self, id: NoteId, front: &str, back: &str) -> Result<(), StoreError>;

    async fn delete_cards(&self, ids: &[NoteId]) -> Result<(), StoreError>;

    async fn create_deck(&self, name: &str) -> Result<(), StoreError>;
}

/// `deck:"<deck>"`
pub fn deck_query(deck: &str) -> String {
    format!("deck:\"{deck}\"")
}

/// `deck:"<deck>" tag:<plugin tag>`
pub fn tagged_deck_query(deck: &str) -> String {
    format!("deck:\"{deck}\" tag:{PLUGIN_TAG}")
}
