//! Add/update/delete classification.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::index::normalize_field;
use super::{Connector, SyncTarget};
use crate::error::{StoreError, SyncError};
use crate::store::{tagged_deck_query, RemoteCardStore};
use panda_core::{Card, CardAction, CardSyncInfo, NoteId, SyncAnalysis};

enum Classification {
    Add,
    Update(NoteId),
    UpToDate,
}

impl<S: RemoteCardStore> Connector<S> {
    /// Compute the plan that brings the target deck in line with `cards`.
    ///
    /// Only an unreachable store fails the call. Per-card and orphan-scan
    /// failures degrade to ADD/UPDATE or to no deletions.
    pub async fn analyze(
        &mut self,
        cards: &[Card],
        target: &SyncTarget,
    ) -> Result<SyncAnalysis, SyncError> {
        self.ensure_connected().await?;

        let deck_name = target.deck_name.as_str();
        let mut analysis = SyncAnalysis::new(cards.len());

        for card in cards {
            let classification = match self.classify(card, deck_name).await {
                Ok(c) => c,
                Err(e) => {
                    warn!(question = %card.question, error = %e, "classification failed, scheduling add");
                    Classification::Add
                }
            };

            match classification {
                Classification::Add => {
                    analysis
                        .to_add
                        .push(sync_info(card.clone(), CardAction::Add, deck_name, None));
                }
                Classification::Update(id) => {
                    analysis
                        .to_update
                        .push(sync_info(card.clone(), CardAction::Update, deck_name, Some(id)));
                }
                Classification::UpToDate => {}
            }
        }

        if target.note_scoped {
            match self.find_orphans(cards, deck_name).await {
                Ok(orphans) => analysis.to_delete = orphans,
                Err(e) => warn!(deck = deck_name, error = %e, "deletion detection failed"),
            }
        }

        info!(
            deck = deck_name,
            total = analysis.total_extracted,
            add = analysis.to_add.len(),
            update = analysis.to_update.len(),
            delete = analysis.to_delete.len(),
            "sync analysis complete"
        );

        Ok(analysis)
    }

    async fn classify(&mut self, card: &Card, deck_name: &str) -> Result<Classification, StoreError> {
        self.index.ensure_loaded(&self.store, deck_name).await?;

        let Some(entry) = self.index.lookup(&card.question) else {
            return Ok(Classification::Add);
        };
        let id = entry.remote_id;

        match self.store.fetch_card_details(&[id]).await {
            Ok(notes) => match notes.first() {
                Some(note) if fields_match(&note.front, &note.back, card) => {
                    Ok(Classification::UpToDate)
                }
                _ => Ok(Classification::Update(id)),
            },
            Err(e) => {
                debug!(note = %id, error = %e, "note detail fetch failed, scheduling update");
                Ok(Classification::Update(id))
            }
        }
    }

    /// Plugin-tagged notes in the deck whose question no longer appears in
    /// the note, in remote order.
    async fn find_orphans(
        &self,
        cards: &[Card],
        deck_name: &str,
    ) -> Result<Vec<CardSyncInfo>, StoreError> {
        let ids = self.store.find_cards(&tagged_deck_query(deck_name)).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let notes = self.store.fetch_card_details(&ids).await?;
        let extracted: HashSet<String> = cards.iter().map(|c| normalize_field(&c.question)).collect();

        Ok(notes
            .into_iter()
            .filter_map(|note| {
                let front = normalize_field(&note.front);
                if front.is_empty() || extracted.contains(&front) {
                    return None;
                }
                let remote = Card::new(front, normalize_field(&note.back), 0);
                Some(sync_info(remote, CardAction::Delete, deck_name, Some(note.id)))
            })
            .collect())
    }
}

/// Whether the remote fields already hold the card's content.
pub(super) fn fields_match(front: &str, back: &str, card: &Card) -> bool {
    front.trim() == card.question.trim() && back.trim() == card.answer.trim()
}

fn sync_info(card: Card, action: CardAction, deck_name: &str, existing_id: Option<NoteId>) -> CardSyncInfo {
    CardSyncInfo {
        card,
        action,
        deck_name: deck_name.to_string(),
        existing_id,
    }
}
