//! AnkiConnect JSON-RPC client.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::protocol::{
    AddNoteParams, DeckParams, FindNotesParams, NewNote, NoteFields, NoteInfo, NoteUpdate,
    NotesParams, Request, Response, UpdateNoteFieldsParams,
};
use crate::error::StoreError;
use crate::store::{RemoteCardStore, RemoteNote};
use panda_core::{BridgeSettings, NoteId};

/// AnkiConnect API version spoken by this client.
pub const ANKI_CONNECT_VERSION: u32 = 6;

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Client for the AnkiConnect add-on.
#[derive(Debug, Clone)]
pub struct AnkiClient {
    client: Client,
    url: String,
    note_type: String,
}

impl AnkiClient {
    /// Create a client from the connection settings.
    pub fn new(settings: &BridgeSettings) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: build_url(&settings.anki_connect_url, settings.anki_connect_port),
            note_type: settings.note_type.clone(),
        })
    }

    /// Endpoint requests are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Version reported by AnkiConnect.
    pub async fn version(&self) -> Result<u32, StoreError> {
        self.call::<(), u32>("version", None).await
    }

    async fn call<P, T>(&self, action: &str, params: Option<P>) -> Result<T, StoreError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        self.invoke(action, params)
            .await?
            .ok_or_else(|| StoreError::Parse(format!("{action} returned no result")))
    }

    async fn call_unit<P: Serialize>(&self, action: &str, params: P) -> Result<(), StoreError> {
        self.invoke::<P, serde_json::Value>(action, Some(params))
            .await
            .map(|_| ())
    }

    async fn invoke<P, T>(&self, action: &str, params: Option<P>) -> Result<Option<T>, StoreError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        debug!(action, url = %self.url, "AnkiConnect request");

        let request = Request {
            action,
            version: ANKI_CONNECT_VERSION,
            params,
        };

        let resp = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StoreError::Http {
                status: resp.status().as_u16(),
            });
        }

        let response: Response<T> = resp
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        response.into_result()
    }
}

#[async_trait]
impl RemoteCardStore for AnkiClient {
    async fn test_connection(&self) -> bool {
        match self.version().await {
            Ok(version) => version >= ANKI_CONNECT_VERSION,
            Err(e) => {
                debug!(error = %e, "AnkiConnect version check failed");
                false
            }
        }
    }

    async fn find_cards(&self, query: &str) -> Result<Vec<NoteId>, StoreError> {
        self.invoke("findNotes", Some(FindNotesParams { query }))
            .await
            .map(Option::unwrap_or_default)
    }

    async fn fetch_card_details(&self, ids: &[NoteId]) -> Result<Vec<RemoteNote>, StoreError> {
        let infos: Vec<NoteInfo> = self
            .invoke("notesInfo", Some(NotesParams { notes: ids }))
            .await?
            .unwrap_or_default();

        Ok(infos
            .into_iter()
            .filter_map(NoteInfo::into_remote_note)
            .collect())
    }

    async fn create_card(
        &self,
        deck: &str,
        front: &str,
        back: &str,
        tags: &[&str],
    ) -> Result<NoteId, StoreError> {
        let params = AddNoteParams {
            note: NewNote {
                deck_name: deck,
                model_name: &self.note_type,
                fields: NoteFields { front, back },
                tags,
            },
        };
        self.call("addNote", Some(params)).await
    }

    async fn update_card_fields(&self, id: NoteId, front: &str, back: &str) -> Result<(), StoreError> {
        let params = UpdateNoteFieldsParams {
            note: NoteUpdate {
                id,
                fields: NoteFields { front, back },
            },
        };
        self.call_unit("updateNoteFields", params).await
    }

    async fn delete_cards(&self, ids: &[NoteId]) -> Result<(), StoreError> {
        self.call_unit("deleteNotes", NotesParams { notes: ids }).await
    }

    async fn create_deck(&self, name: &str) -> Result<(), StoreError> {
        self.call_unit("createDeck", DeckParams { deck: name }).await
    }
}

/// Normalize the configured URL and port into the request endpoint.
///
/// The URL may omit the scheme and may carry its own port; the configured
/// port only applies when it does not.
pub fn build_url(base: &str, port: u16) -> String {
    let base = base.trim();
    let fallback = || format!("http://127.0.0.1:{port}/");
    if base.is_empty() {
        return fallback();
    }

    let parsed = Url::parse(base)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .or_else(|| Url::parse(&format!("http://{base}")).ok());

    match parsed {
        Some(mut url) => {
            if url.port().is_none() && url.set_port(Some(port)).is_err() {
                return fallback();
            }
            url.to_string()
        }
        None => fallback(),
    }
}
