// ── AI ticket draft ──

use serde::{Deserialize, Serialize};

use super::ticket::{Category, NewTicket, Priority};

/// An unpersisted ticket candidate awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
}

impl TicketDraft {
    /// Turn the confirmed draft into store input.
    pub fn into_new_ticket(self, created_by: impl Into<String>) -> NewTicket {
        NewTicket {
            title: self.title,
            description: self.description,
            priority: self.priority,
            category: self.category,
            ..NewTicket::new("", "", created_by)
        }
    }
}
