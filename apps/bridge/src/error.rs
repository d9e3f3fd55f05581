//! Error types for the bridge.

use thiserror::Error;

/// Errors surfaced by a remote card store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    #[error("AnkiConnect error: {0}")]
    Api(String),

    #[error("Duplicate note: {0}")]
    Duplicate(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl StoreError {
    /// Whether the store rejected a create because the note already exists.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Classify an error message returned by AnkiConnect.
    pub fn from_api_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("duplicate") || lower.contains("cannot create note") {
            Self::Duplicate(message)
        } else {
            Self::Api(message)
        }
    }
}

/// Errors that abort an analyze or apply run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(
        "Cannot connect to Anki Connect. Make sure Anki is running with AnkiConnect addon installed."
    )]
    NotConnected,

    #[error(transparent)]
    Store(#[from] StoreError),
}
