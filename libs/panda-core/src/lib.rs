//! Core note-to-card library shared by the bridge application.
//!
//! Provides:
//! - Tag configuration and pattern construction
//! - Image reference parsing (wiki links, embeds, markdown images)
//! - Card extraction from free-form note text
//! - Deck-name resolution for a note
//! - Shared types (Card, SyncAnalysis, BridgeSettings, etc.)

pub mod deck;
pub mod error;
pub mod image;
pub mod parser;
pub mod tags;
pub mod types;

pub use deck::resolve_deck_name;
pub use error::{ExtractError, Result};
pub use image::parse_image;
pub use parser::{extract, Extractor};
pub use tags::{escape, tag_pattern, TagConfig, TagPatterns};
pub use types::{
    BridgeSettings, Card, CardAction, CardSyncInfo, NoteId, RemoteCardEntry, SyncAnalysis,
};
