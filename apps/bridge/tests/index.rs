//! Remote card index tests.

mod common;

use pretty_assertions::assert_eq;

use common::{Failures, MemoryStore};
use panda_bridge::sync::RemoteCardIndex;

#[tokio::test]
async fn test_tagged_notes_preferred() {
    let store = MemoryStore::new()
        .with_tagged("Deck", "Ours", "1")
        .with_untagged("Deck", "Theirs", "2");
    let mut index = RemoteCardIndex::new();

    index.ensure_loaded(&store, "Deck").await.unwrap();

    assert!(index.is_loaded_for("Deck"));
    assert_eq!(index.len(), 1);
    assert!(index.lookup("Ours").is_some());
    assert!(index.lookup("Theirs").is_none());
}

#[tokio::test]
async fn test_falls_back_to_whole_deck() {
    let store = MemoryStore::new().with_untagged("Deck", "Theirs", "2");
    let mut index = RemoteCardIndex::new();

    index.ensure_loaded(&store, "Deck").await.unwrap();

    let entry = index.lookup("Theirs").unwrap();
    assert_eq!(entry.front, "Theirs");
    assert_eq!(entry.back, "2");
    assert_eq!(store.calls().find, 2);
}

#[tokio::test]
async fn test_lookup_trims_question() {
    let store = MemoryStore::new().with_tagged("Deck", " Padded \n", "x");
    let mut index = RemoteCardIndex::new();

    index.ensure_loaded(&store, "Deck").await.unwrap();

    let entry = index.lookup("  Padded").unwrap();
    assert_eq!(entry.normalized_question, "Padded");
    assert_eq!(entry.front, " Padded \n");
}

#[tokio::test]
async fn test_later_note_wins_on_same_question() {
    let store = MemoryStore::new()
        .with_tagged("Deck", "Same", "first")
        .with_tagged("Deck", "Same", "second");
    let mut index = RemoteCardIndex::new();

    index.ensure_loaded(&store, "Deck").await.unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.lookup("Same").unwrap().back, "second");
}

#[tokio::test]
async fn test_reuses_cache_for_same_deck() {
    let store = MemoryStore::new().with_tagged("Deck", "Q", "A");
    let mut index = RemoteCardIndex::new();

    index.ensure_loaded(&store, "Deck").await.unwrap();
    index.ensure_loaded(&store, "Deck").await.unwrap();

    assert_eq!(store.calls().find, 1);
    assert_eq!(store.calls().details, 1);
}

#[tokio::test]
async fn test_reloads_for_other_deck() {
    let store = MemoryStore::new()
        .with_tagged("One", "Q1", "A")
        .with_tagged("Two", "Q2", "A");
    let mut index = RemoteCardIndex::new();

    index.ensure_loaded(&store, "One").await.unwrap();
    index.ensure_loaded(&store, "Two").await.unwrap();

    assert_eq!(index.deck_name(), Some("Two"));
    assert!(index.lookup("Q1").is_none());
    assert!(index.lookup("Q2").is_some());
}

#[tokio::test]
async fn test_invalidate_forces_reload() {
    let store = MemoryStore::new().with_tagged("Deck", "Q", "A");
    let mut index = RemoteCardIndex::new();

    index.ensure_loaded(&store, "Deck").await.unwrap();
    store.insert("Deck", "Added later", "B", &["panda-bridge"]);
    assert!(index.lookup("Added later").is_none());

    index.invalidate();
    assert_eq!(index.deck_name(), None);

    index.ensure_loaded(&store, "Deck").await.unwrap();
    assert!(index.lookup("Added later").is_some());
}

#[tokio::test]
async fn test_empty_deck_loads_empty() {
    let store = MemoryStore::new();
    let mut index = RemoteCardIndex::new();

    index.ensure_loaded(&store, "Empty").await.unwrap();

    assert!(index.is_loaded_for("Empty"));
    assert!(index.is_empty());
    assert_eq!(store.calls().details, 0);
}

#[tokio::test]
async fn test_query_failures_load_empty() {
    let store = MemoryStore::new()
        .with_tagged("Deck", "Q", "A")
        .with_failures(Failures {
            find_tagged: true,
            find_deck: true,
            ..Failures::default()
        });
    let mut index = RemoteCardIndex::new();

    index.ensure_loaded(&store, "Deck").await.unwrap();

    assert!(index.is_loaded_for("Deck"));
    assert!(index.is_empty());
}

#[tokio::test]
async fn test_detail_failure_leaves_index_unloaded() {
    let store = MemoryStore::new()
        .with_tagged("Deck", "Q", "A")
        .with_failures(Failures {
            details: true,
            ..Failures::default()
        });
    let mut index = RemoteCardIndex::new();

    assert!(index.ensure_loaded(&store, "Deck").await.is_err());
    assert_eq!(index.deck_name(), None);
    assert!(index.lookup("Q").is_none());
}
