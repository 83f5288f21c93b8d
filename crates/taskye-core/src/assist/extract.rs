// ── Draft extraction from free-form model output ──
//
// The provider is asked for bare JSON but routinely wraps it in fences or
// prose. Extraction: strip fences, locate the first balanced `{...}` object
// (string- and escape-aware), decode it structurally, then validate.
// Enumerations default on invalid input; title and description are required.

use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Category, Priority, TicketDraft};

/// Why a response could not be turned into a draft. Never surfaced to
/// callers: it selects the fallback path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("no JSON object in response")]
    NoObject,
    #[error("required field '{0}' missing or empty")]
    MissingField(&'static str),
}

/// Remove Markdown code-fence markers.
pub fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_owned()
}

/// First balanced JSON object in `text`, honoring string literals.
/// Falls back to the first-`{`-to-last-`}` span when no balanced candidate
/// decodes.
pub fn find_object(text: &str) -> Option<Map<String, Value>> {
    for (start, _) in text.match_indices('{') {
        let Some(end) = balanced_end(text, start) else {
            continue;
        };
        if let Ok(Value::Object(map)) = serde_json::from_str(&text[start..=end]) {
            return Some(map);
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Byte index of the `}` closing the object opened at `start`.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode a draft from raw model text.
pub fn parse_draft(text: &str) -> Result<TicketDraft, ParseFailure> {
    let cleaned = strip_fences(text);
    let object = find_object(&cleaned).ok_or(ParseFailure::NoObject)?;

    let title = required(&object, &["title", "titulo", "título"], "title")?;
    let description = required(
        &object,
        &["description", "descricao", "descrição"],
        "description",
    )?;

    let priority = field(&object, &["priority", "prioridade"])
        .and_then(|raw| Priority::from_str(raw.trim()).ok())
        .unwrap_or_default();
    let category = field(&object, &["category", "categoria"])
        .and_then(|raw| Category::from_str(raw.trim()).ok())
        .unwrap_or_default();

    Ok(TicketDraft {
        title,
        description,
        priority,
        category,
    })
}

fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|n| object.get(*n)?.as_str())
}

fn required(
    object: &Map<String, Value>,
    names: &[&str],
    label: &'static str,
) -> Result<String, ParseFailure> {
    field(object, names)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or(ParseFailure::MissingField(label))
}
