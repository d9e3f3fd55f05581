//! AnkiConnect request/response types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::StoreError;
use crate::store::RemoteNote;
use panda_core::NoteId;

#[derive(Debug, Serialize)]
pub(crate) struct Request<'a, P> {
    pub action: &'a str,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<P>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Response<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> Response<T> {
    /// A non-null `error` wins over any result.
    pub fn into_result(self) -> Result<Option<T>, StoreError> {
        match self.error {
            Some(message) => Err(StoreError::from_api_message(message)),
            None => Ok(self.result),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FindNotesParams<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NotesParams<'a> {
    pub notes: &'a [NoteId],
}

#[derive(Debug, Serialize)]
pub(crate) struct DeckParams<'a> {
    pub deck: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NoteFields<'a> {
    #[serde(rename = "Front")]
    pub front: &'a str,
    #[serde(rename = "Back")]
    pub back: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewNote<'a> {
    pub deck_name: &'a str,
    pub model_name: &'a str,
    pub fields: NoteFields<'a>,
    pub tags: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub(crate) struct AddNoteParams<'a> {
    pub note: NewNote<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NoteUpdate<'a> {
    pub id: NoteId,
    pub fields: NoteFields<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateNoteFieldsParams<'a> {
    pub note: NoteUpdate<'a>,
}

/// One entry of a `notesInfo` result. Unknown ids come back as `{}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NoteInfo {
    pub note_id: Option<NoteId>,
    #[serde(default)]
    pub fields: HashMap<String, NoteField>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteField {
    pub value: String,
}

impl NoteInfo {
    fn field(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    pub fn into_remote_note(self) -> Option<RemoteNote> {
        let id = self.note_id?;
        Some(RemoteNote {
            id,
            front: self.field("Front"),
            back: self.field("Back"),
        })
    }
}
