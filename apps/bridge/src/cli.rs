//! Command-line interface.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Component, Path, PathBuf};

use crate::sync::NoteSource;
use panda_core::BridgeSettings;

#[derive(Debug, Parser)]
#[command(name = "panda-bridge", version, about = "Sync Q/A cards from markdown notes to Anki")]
pub struct Cli {
    /// JSON settings file.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// AnkiConnect URL.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// AnkiConnect port.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Deck used when the note does not determine one.
    #[arg(long, global = true)]
    pub deck: Option<String>,

    /// Vault root; note paths are taken relative to it.
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the cards found in a note as JSON.
    Extract { note: PathBuf },
    /// Test the AnkiConnect connection.
    Check,
    /// Show what a sync would add, update and remove.
    Analyze { note: PathBuf },
    /// Sync a note's cards to Anki.
    Sync {
        note: PathBuf,
        /// Also delete cards that were removed from the note.
        #[arg(long)]
        delete: bool,
    },
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut BridgeSettings) {
        if let Some(url) = &self.url {
            settings.anki_connect_url = url.clone();
        }
        if let Some(port) = self.port {
            settings.anki_connect_port = port;
        }
        if let Some(deck) = &self.deck {
            settings.default_deck = deck.clone();
        }
    }

    /// Read a note file into a [`NoteSource`].
    pub fn read_note(&self, note: &Path) -> anyhow::Result<NoteSource> {
        let content = std::fs::read_to_string(note)
            .with_context(|| format!("failed to read note {}", note.display()))?;
        Ok(NoteSource::new(note_path(note, self.vault.as_deref()), content))
    }
}

/// Vault-relative path with `/` separators.
pub fn note_path(note: &Path, vault: Option<&Path>) -> String {
    let relative = vault
        .and_then(|root| note.strip_prefix(root).ok())
        .unwrap_or(note);

    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
