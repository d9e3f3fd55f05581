//! Image reference parsing.
//!
//! Accepted forms, first match wins:
//! - `[[path|label]]` or `![[path]]` filling the whole input
//! - `![alt](path "title")` filling the whole input
//! - either link form anywhere inside the input
//! - a bare path or URL

use regex::Regex;
use std::sync::OnceLock;

static WIKI_WHOLE: OnceLock<Regex> = OnceLock::new();
static MARKDOWN_WHOLE: OnceLock<Regex> = OnceLock::new();
static WIKI_ANY: OnceLock<Regex> = OnceLock::new();
static MARKDOWN_ANY: OnceLock<Regex> = OnceLock::new();

/// Parse the text following an image tag into a path or URL.
///
/// Returns `None` for empty or whitespace-only input.
pub fn parse_image(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let wiki_whole = WIKI_WHOLE.get_or_init(|| Regex::new(r"^!?\[\[([^\]]+)\]\]$").unwrap());
    let markdown_whole =
        MARKDOWN_WHOLE.get_or_init(|| Regex::new(r"^!\[[^\]]*\]\(([^)]+)\)$").unwrap());
    let wiki_any = WIKI_ANY.get_or_init(|| Regex::new(r"!?\[\[([^\]]+)\]\]").unwrap());
    let markdown_any = MARKDOWN_ANY.get_or_init(|| Regex::new(r"!\[[^\]]*\]\(([^)]+)\)").unwrap());

    let resolved = if let Some(inner) = first_group(wiki_whole, text) {
        wiki_target(inner)
    } else if let Some(inner) = first_group(markdown_whole, text) {
        markdown_target(inner)
    } else if let Some(inner) = first_group(wiki_any, text) {
        wiki_target(inner)
    } else if let Some(inner) = first_group(markdown_any, text) {
        markdown_target(inner)
    } else {
        text
    };

    if resolved.is_empty() {
        None
    } else {
        Some(resolved.to_string())
    }
}

fn first_group<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `path|label` -> `path`
fn wiki_target(inner: &str) -> &str {
    inner.split('|').next().unwrap_or_default().trim()
}

/// `path "title"` -> `path`
fn markdown_target(inner: &str) -> &str {
    inner.split_whitespace().next().unwrap_or_default()
}
