//! Layered configuration: defaults, settings file, environment.

use anyhow::Context;
use std::path::Path;

use panda_core::BridgeSettings;

/// Load settings from an optional JSON file, then `.env` and the
/// environment.
pub fn load(settings_file: Option<&Path>) -> anyhow::Result<BridgeSettings> {
    dotenvy::dotenv().ok();

    let mut settings = match settings_file {
        Some(path) => read_settings_file(path)?,
        None => BridgeSettings::default(),
    };

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

/// Read a JSON settings file; missing keys keep their defaults.
pub fn read_settings_file(path: &Path) -> anyhow::Result<BridgeSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid settings file {}", path.display()))
}

/// Override settings from `PANDA_*` variables.
pub fn apply_env<F>(settings: &mut BridgeSettings, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let strings: [(&str, &mut String); 7] = [
        ("PANDA_ANKI_URL", &mut settings.anki_connect_url),
        ("PANDA_DEFAULT_DECK", &mut settings.default_deck),
        ("PANDA_DECK_OVERRIDE_WORD", &mut settings.deck_override_word),
        ("PANDA_QUESTION_WORD", &mut settings.question_word),
        ("PANDA_ANSWER_WORD", &mut settings.answer_word),
        ("PANDA_IMAGE_WORD", &mut settings.image_word),
        ("PANDA_NOTE_TYPE", &mut settings.note_type),
    ];
    for (key, field) in strings {
        if let Some(value) = lookup(key) {
            *field = value;
        }
    }

    if let Some(port) = lookup("PANDA_ANKI_PORT") {
        settings.anki_connect_port = port
            .trim()
            .parse()
            .with_context(|| format!("PANDA_ANKI_PORT is not a valid port: {port}"))?;
    }

    if let Some(flag) = lookup("PANDA_USE_NOTE_BASED") {
        settings.use_note_based = parse_bool(&flag)
            .with_context(|| format!("PANDA_USE_NOTE_BASED is not a boolean: {flag}"))?;
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
