//! Deck-scoped cache of remote cards keyed by question text.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::{deck_query, tagged_deck_query, RemoteCardStore};
use panda_core::{NoteId, RemoteCardEntry};

/// Normalize a field value for comparison.
pub fn normalize_field(value: &str) -> String {
    value.trim().to_string()
}

#[derive(Debug)]
struct DeckCache {
    deck_name: String,
    by_question: HashMap<String, RemoteCardEntry>,
}

/// Lookup from normalized question to remote card for the most recently
/// loaded deck.
///
/// The cache has no expiry. It is rebuilt when a different deck is
/// requested and must be invalidated after any remote write.
#[derive(Debug, Default)]
pub struct RemoteCardIndex {
    cache: Option<DeckCache>,
}

impl RemoteCardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deck the cache currently covers.
    pub fn deck_name(&self) -> Option<&str> {
        self.cache.as_ref().map(|c| c.deck_name.as_str())
    }

    pub fn is_loaded_for(&self, deck_name: &str) -> bool {
        self.deck_name() == Some(deck_name)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.by_question.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load the deck's cards unless the cache already covers it.
    ///
    /// Plugin-tagged notes are preferred; an empty tagged result falls back
    /// to the whole deck. A failure leaves the cache empty.
    pub async fn ensure_loaded<S>(&mut self, store: &S, deck_name: &str) -> Result<(), StoreError>
    where
        S: RemoteCardStore + ?Sized,
    {
        if self.is_loaded_for(deck_name) {
            return Ok(());
        }
        self.cache = None;

        let ids = find_deck_notes(store, deck_name).await;
        let mut by_question = HashMap::new();

        if !ids.is_empty() {
            let notes = store.fetch_card_details(&ids).await.map_err(|e| {
                warn!(deck = deck_name, error = %e, "failed to load remote cards");
                e
            })?;

            for note in notes {
                let key = normalize_field(&note.front);
                by_question.insert(
                    key.clone(),
                    RemoteCardEntry {
                        remote_id: note.id,
                        normalized_question: key,
                        front: note.front,
                        back: note.back,
                    },
                );
            }
        }

        debug!(deck = deck_name, entries = by_question.len(), "remote card index loaded");
        self.cache = Some(DeckCache {
            deck_name: deck_name.to_string(),
            by_question,
        });
        Ok(())
    }

    /// Exact match on the trimmed question.
    pub fn lookup(&self, question: &str) -> Option<&RemoteCardEntry> {
        self.cache
            .as_ref()
            .and_then(|c| c.by_question.get(question.trim()))
    }

    /// Drop the cache.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}

async fn find_deck_notes<S>(store: &S, deck_name: &str) -> Vec<NoteId>
where
    S: RemoteCardStore + ?Sized,
{
    let tagged = store
        .find_cards(&tagged_deck_query(deck_name))
        .await
        .unwrap_or_else(|e| {
            debug!(deck = deck_name, error = %e, "tagged note query failed");
            Vec::new()
        });
    if !tagged.is_empty() {
        return tagged;
    }

    store
        .find_cards(&deck_query(deck_name))
        .await
        .unwrap_or_else(|e| {
            debug!(deck = deck_name, error = %e, "deck note query failed");
            Vec::new()
        })
}
