// Deterministic draft built from the raw message when extraction fails.
// Never fails.

use crate::model::{Category, Priority, TicketDraft};

const TITLE_WORDS: usize = 8;
const TITLE_CHARS: usize = 60;

/// Up to eight space-separated words: the message cut to 60 characters.
/// Longer: the first eight words followed by `...`.
pub fn fallback_title(message: &str) -> String {
    let words: Vec<&str> = message.split(' ').collect();
    if words.len() <= TITLE_WORDS {
        message.chars().take(TITLE_CHARS).collect()
    } else {
        let head: Vec<&str> = words.into_iter().take(TITLE_WORDS).collect();
        format!("{}...", head.join(" "))
    }
}

pub fn fallback_draft(message: &str) -> TicketDraft {
    TicketDraft {
        title: fallback_title(message),
        description: message.to_owned(),
        priority: Priority::Medium,
        category: Category::Other,
    }
}
