//! Markdown fence parser for LLM output.
//!
//! Models are told to return bare JSON but regularly wrap it in a code fence.
//! Grammar accepted here:
//!
//! ```text
//! response := ws* ( fenced | bare ) ws*
//! fenced   := "```" tag? ws* body ( "```" .* | EOF )
//! tag      := [A-Za-z0-9_+-]+
//! ```
//!
//! Anything after the closing fence is discarded.

const FENCE: &str = "```";

/// Strips an optional ```` ```json ... ``` ```` / ```` ``` ... ``` ```` wrapper and
/// surrounding whitespace. Unfenced input is returned trimmed.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(after_open) = text.strip_prefix(FENCE) else {
        return text;
    };

    let tag_len = after_open
        .find(|c: char| !is_tag_char(c))
        .unwrap_or(after_open.len());
    let body = &after_open[tag_len..];

    match body.find(FENCE) {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-')
}
