//! Common test utilities for bridge integration tests.
//!
//! Provides an in-memory [`RemoteCardStore`] that understands the deck and
//! tag queries the bridge issues, with switches for injecting failures.

pub mod fixtures;

use std::sync::Mutex;

use async_trait::async_trait;

use panda_bridge::error::StoreError;
use panda_bridge::store::{RemoteCardStore, RemoteNote, PLUGIN_TAG};
use panda_bridge::sync::Connector;
use panda_core::{BridgeSettings, NoteId};

/// A note held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNote {
    pub id: NoteId,
    pub deck: String,
    pub front: String,
    pub back: String,
    pub tags: Vec<String>,
}

/// Operations that can be made to fail.
#[derive(Debug, Default, Clone)]
pub struct Failures {
    pub find_tagged: bool,
    pub find_deck: bool,
    pub details: bool,
    /// Detail fetches succeed this many times, then fail.
    pub details_fail_after: Option<usize>,
    /// Fronts whose creation fails with an API error.
    pub create: Vec<String>,
    /// Every create is rejected as a duplicate.
    pub create_duplicate: bool,
    pub update: bool,
    pub delete: bool,
}

/// Number of calls per operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calls {
    pub find: usize,
    pub details: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub create_deck: usize,
}

#[derive(Debug)]
struct State {
    connected: bool,
    next_id: i64,
    notes: Vec<StoredNote>,
    decks: Vec<String>,
    failures: Failures,
    calls: Calls,
}

/// In-memory remote card store.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                connected: true,
                next_id: 1000,
                notes: Vec::new(),
                decks: Vec::new(),
                failures: Failures::default(),
                calls: Calls::default(),
            }),
        }
    }

    /// A store that fails every connection test.
    pub fn disconnected() -> Self {
        let store = Self::new();
        store.state.lock().unwrap().connected = false;
        store
    }

    /// Add a note created by the bridge.
    pub fn with_tagged(self, deck: &str, front: &str, back: &str) -> Self {
        self.insert(deck, front, back, &[PLUGIN_TAG, "obsidian"]);
        self
    }

    /// Add a note created outside the bridge.
    pub fn with_untagged(self, deck: &str, front: &str, back: &str) -> Self {
        self.insert(deck, front, back, &[]);
        self
    }

    pub fn with_failures(self, failures: Failures) -> Self {
        self.state.lock().unwrap().failures = failures;
        self
    }

    pub fn insert(&self, deck: &str, front: &str, back: &str, tags: &[&str]) -> NoteId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = NoteId(state.next_id);
        state.notes.push(StoredNote {
            id,
            deck: deck.to_string(),
            front: front.to_string(),
            back: back.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        id
    }

    pub fn notes(&self) -> Vec<StoredNote> {
        self.state.lock().unwrap().notes.clone()
    }

    pub fn notes_in(&self, deck: &str) -> Vec<StoredNote> {
        self.notes().into_iter().filter(|n| n.deck == deck).collect()
    }

    pub fn note(&self, front: &str) -> Option<StoredNote> {
        self.notes().into_iter().find(|n| n.front == front)
    }

    pub fn decks(&self) -> Vec<String> {
        self.state.lock().unwrap().decks.clone()
    }

    pub fn calls(&self) -> Calls {
        self.state.lock().unwrap().calls
    }
}

/// `deck:"X"` or `deck:"X" tag:T`.
fn parse_query(query: &str) -> (String, Option<String>) {
    let rest = query.strip_prefix("deck:\"").unwrap_or(query);
    let (deck, rest) = rest.split_once('"').unwrap_or((rest, ""));
    let tag = rest.trim().strip_prefix("tag:").map(str::to_string);
    (deck.to_string(), tag)
}

#[async_trait]
impl RemoteCardStore for MemoryStore {
    async fn test_connection(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    async fn find_cards(&self, query: &str) -> Result<Vec<NoteId>, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.find += 1;

        let (deck, tag) = parse_query(query);
        let failing = match tag {
            Some(_) => state.failures.find_tagged,
            None => state.failures.find_deck,
        };
        if failing {
            return Err(StoreError::Network("connection reset".to_string()));
        }

        Ok(state
            .notes
            .iter()
            .filter(|n| n.deck == deck)
            .filter(|n| tag.as_ref().map_or(true, |t| n.tags.contains(t)))
            .map(|n| n.id)
            .collect())
    }

    async fn fetch_card_details(&self, ids: &[NoteId]) -> Result<Vec<RemoteNote>, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.details += 1;
        let exhausted = state
            .failures
            .details_fail_after
            .is_some_and(|limit| state.calls.details > limit);
        if state.failures.details || exhausted {
            return Err(StoreError::Http { status: 500 });
        }

        Ok(ids
            .iter()
            .filter_map(|id| state.notes.iter().find(|n| n.id == *id))
            .map(|n| RemoteNote {
                id: n.id,
                front: n.front.clone(),
                back: n.back.clone(),
            })
            .collect())
    }

    async fn create_card(
        &self,
        deck: &str,
        front: &str,
        back: &str,
        tags: &[&str],
    ) -> Result<NoteId, StoreError> {
        {
            let mut state = self.state.lock().unwrap();
            state.calls.create += 1;
            if state.failures.create_duplicate {
                return Err(StoreError::from_api_message(
                    "cannot create note because it is a duplicate",
                ));
            }
            if state.failures.create.iter().any(|f| f == front) {
                return Err(StoreError::Api("model was not found".to_string()));
            }
        }
        Ok(self.insert(deck, front, back, tags))
    }

    async fn update_card_fields(&self, id: NoteId, front: &str, back: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.update += 1;
        if state.failures.update {
            return Err(StoreError::Api("note was not found".to_string()));
        }

        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| StoreError::Api(format!("note was not found: {id}")))?;
        note.front = front.to_string();
        note.back = back.to_string();
        Ok(())
    }

    async fn delete_cards(&self, ids: &[NoteId]) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.delete += 1;
        if state.failures.delete {
            return Err(StoreError::Network("timed out".to_string()));
        }
        state.notes.retain(|n| !ids.contains(&n.id));
        Ok(())
    }

    async fn create_deck(&self, name: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_deck += 1;
        if !state.decks.iter().any(|d| d == name) {
            state.decks.push(name.to_string());
        }
        Ok(())
    }
}

/// A connector over `store` with default settings.
pub fn connector(store: MemoryStore) -> Connector<MemoryStore> {
    Connector::new(store, BridgeSettings::default())
}

/// A connector that always syncs into the default deck.
pub fn default_deck_connector(store: MemoryStore) -> Connector<MemoryStore> {
    let settings = BridgeSettings {
        use_note_based: false,
        ..BridgeSettings::default()
    };
    Connector::new(store, settings)
}
