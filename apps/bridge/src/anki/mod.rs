//! AnkiConnect transport.

mod client;
mod protocol;

pub use client::{build_url, AnkiClient, ANKI_CONNECT_VERSION, DEFAULT_TIMEOUT};
