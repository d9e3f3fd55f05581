//! Applying a sync plan to the remote store.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use super::analyze::fields_match;
use super::{Connector, SyncTarget};
use crate::error::{StoreError, SyncError};
use crate::store::{RemoteCardStore, NOTE_TAGS};
use panda_core::{Card, NoteId, SyncAnalysis};

/// Outcome of applying one card, or of the deletion step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncOutcome {
    Added { question: String, deck: String },
    Updated { question: String, deck: String },
    /// The store already holds this card.
    Skipped { question: String, deck: String },
    Failed { question: String, reason: String },
    Deleted { count: usize },
    DeleteFailed { reason: String },
}

impl SyncOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::DeleteFailed { .. })
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { question, deck } => write!(f, "Added: {question} → {deck}"),
            Self::Updated { question, deck } => write!(f, "Updated: {question} → {deck}"),
            Self::Skipped { question, deck } => {
                write!(f, "Skipped (already exists): {question} → {deck}")
            }
            Self::Failed { question, reason } => write!(f, "Failed: {question} - {reason}"),
            Self::Deleted { count } => write!(f, "Deleted {count} notes from Anki"),
            Self::DeleteFailed { reason } => write!(f, "Failed to delete notes: {reason}"),
        }
    }
}

impl<S: RemoteCardStore> Connector<S> {
    /// Write `cards` to the target deck, then delete the analysis' orphans
    /// when `delete_confirmed`.
    ///
    /// Individual failures are reported as outcomes; processing continues
    /// with the remaining cards.
    pub async fn apply(
        &mut self,
        cards: &[Card],
        target: &SyncTarget,
        analysis: &SyncAnalysis,
        delete_confirmed: bool,
    ) -> Result<Vec<SyncOutcome>, SyncError> {
        self.ensure_connected().await?;

        let deck_name = target.deck_name.as_str();

        if target.note_scoped {
            if let Err(e) = self.store.create_deck(deck_name).await {
                debug!(deck = deck_name, error = %e, "deck creation failed");
            }
        }

        let mut outcomes = Vec::with_capacity(cards.len() + 1);

        for card in cards {
            let outcome = match self.apply_card(card, deck_name).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(question = %card.question, error = %e, "card sync failed");
                    SyncOutcome::Failed {
                        question: card.question.clone(),
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        if delete_confirmed && target.note_scoped {
            let ids: Vec<NoteId> = analysis
                .to_delete
                .iter()
                .filter_map(|d| d.existing_id)
                .collect();

            if !ids.is_empty() {
                match self.store.delete_cards(&ids).await {
                    Ok(()) => {
                        self.index.invalidate();
                        outcomes.push(SyncOutcome::Deleted { count: ids.len() });
                    }
                    Err(e) => {
                        warn!(deck = deck_name, error = %e, "failed to delete notes");
                        outcomes.push(SyncOutcome::DeleteFailed {
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            deck = deck_name,
            results = outcomes.len(),
            failures = outcomes.iter().filter(|o| o.is_failure()).count(),
            "sync applied"
        );

        Ok(outcomes)
    }

    async fn apply_card(&mut self, card: &Card, deck_name: &str) -> Result<SyncOutcome, StoreError> {
        let existing = match self.index.ensure_loaded(&self.store, deck_name).await {
            Ok(()) => self.index.lookup(&card.question).cloned(),
            Err(e) => {
                debug!(error = %e, "index unavailable, treating card as new");
                None
            }
        };

        let question = card.question.clone();
        let deck = deck_name.to_string();

        if let Some(entry) = existing {
            if fields_match(&entry.front, &entry.back, card) {
                return Ok(SyncOutcome::Skipped { question, deck });
            }

            self.store
                .update_card_fields(entry.remote_id, &card.question, &card.answer)
                .await?;
            self.index.invalidate();
            return Ok(SyncOutcome::Updated { question, deck });
        }

        match self
            .store
            .create_card(deck_name, &card.question, &card.answer, &NOTE_TAGS)
            .await
        {
            Ok(_) => {
                self.index.invalidate();
                Ok(SyncOutcome::Added { question, deck })
            }
            Err(e) if e.is_duplicate() => Ok(SyncOutcome::Skipped { question, deck }),
            Err(e) => Err(e),
        }
    }
}
