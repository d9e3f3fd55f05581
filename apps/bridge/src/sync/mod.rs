//! Reconciliation of extracted cards against the remote store.

mod analyze;
mod apply;
mod index;

pub use apply::SyncOutcome;
pub use index::{normalize_field, RemoteCardIndex};

use panda_core::{extract, resolve_deck_name, BridgeSettings, Card};
use tracing::warn;

use crate::error::SyncError;
use crate::store::RemoteCardStore;

/// A note as handed over by the host application.
#[derive(Debug, Clone, Default)]
pub struct NoteSource {
    /// Vault-relative path, e.g. `bio/Cells.md`.
    pub path: Option<String>,
    pub content: String,
}

impl NoteSource {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            content: content.into(),
        }
    }

    /// A note with no known path.
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            path: None,
            content: content.into(),
        }
    }
}

/// Where a note's cards go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub deck_name: String,
    /// The deck belongs to this one note, so its stray cards are orphans.
    pub note_scoped: bool,
}

impl SyncTarget {
    pub fn new(deck_name: impl Into<String>) -> Self {
        Self {
            deck_name: deck_name.into(),
            note_scoped: false,
        }
    }

    pub fn note_scoped(deck_name: impl Into<String>) -> Self {
        Self {
            deck_name: deck_name.into(),
            note_scoped: true,
        }
    }
}

/// Connects one note's cards to a remote store.
///
/// Holds the only mutable state in a sync run, the [`RemoteCardIndex`].
/// Build a fresh connector per operation rather than sharing one across
/// decks.
pub struct Connector<S> {
    store: S,
    settings: BridgeSettings,
    index: RemoteCardIndex,
}

impl<S: RemoteCardStore> Connector<S> {
    pub fn new(store: S, settings: BridgeSettings) -> Self {
        Self {
            store,
            settings,
            index: RemoteCardIndex::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub fn index(&self) -> &RemoteCardIndex {
        &self.index
    }

    /// Extract cards using the configured tag words.
    pub fn extract(&self, note: &NoteSource) -> Vec<Card> {
        extract(&note.content, &self.settings.tag_config())
    }

    /// Resolve the deck for a note.
    pub fn target_for(&self, note: &NoteSource) -> SyncTarget {
        let deck_name =
            resolve_deck_name(&self.settings, note.path.as_deref(), Some(&note.content));
        SyncTarget {
            deck_name,
            note_scoped: self.settings.use_note_based && note.path.is_some(),
        }
    }

    pub async fn test_connection(&self) -> bool {
        self.store.test_connection().await
    }

    async fn ensure_connected(&self) -> Result<(), SyncError> {
        if self.store.test_connection().await {
            Ok(())
        } else {
            warn!("remote card store is not reachable");
            Err(SyncError::NotConnected)
        }
    }
}
