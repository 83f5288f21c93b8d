// ── Ticket domain types ──

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::stamp;

/// Ticket urgency. Parses English names case-insensitively and the
/// Portuguese labels found in legacy data and model output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Priority {
    #[serde(alias = "Alta")]
    #[strum(to_string = "High", serialize = "alta")]
    High,
    #[default]
    #[serde(alias = "Média", alias = "Media")]
    #[strum(to_string = "Medium", serialize = "média", serialize = "media")]
    Medium,
    #[serde(alias = "Baixa")]
    #[strum(to_string = "Low", serialize = "baixa")]
    Low,
}

/// Lifecycle state of a ticket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Status {
    #[default]
    #[serde(alias = "Aberto")]
    #[strum(to_string = "Open", serialize = "aberto")]
    Open,
    #[serde(alias = "Em Andamento")]
    #[strum(
        to_string = "In Progress",
        serialize = "inprogress",
        serialize = "in-progress",
        serialize = "in_progress",
        serialize = "em andamento"
    )]
    InProgress,
    #[serde(alias = "Aguardando")]
    #[strum(to_string = "Waiting", serialize = "aguardando")]
    Waiting,
    #[serde(alias = "Resolvido")]
    #[strum(to_string = "Resolved", serialize = "resolvido")]
    Resolved,
}

/// Routing bucket for a ticket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Hardware,
    Software,
    #[serde(alias = "Acesso")]
    #[strum(to_string = "Access", serialize = "acesso")]
    Access,
    #[serde(alias = "Rede")]
    #[strum(to_string = "Network", serialize = "rede")]
    Network,
    #[default]
    #[serde(alias = "Outros")]
    #[strum(to_string = "Other", serialize = "outros")]
    Other,
}

// ── Ticket ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub category: Category,
    pub created_by: String,
    #[serde(with = "stamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "stamp")]
    pub updated_at: NaiveDateTime,
    #[serde(default, with = "stamp::option", skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_phone: Option<String>,
    /// Parked in the kanban review lane.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub in_review: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentRef>,
}

impl Ticket {
    pub fn is_resolved(&self) -> bool {
        self.status == Status::Resolved
    }

    /// Hours between creation and resolution, if resolved.
    #[allow(clippy::cast_precision_loss)]
    pub fn resolution_hours(&self) -> Option<f64> {
        let resolved = self.resolved_at?;
        let minutes = (resolved - self.created_at).num_minutes();
        Some(minutes as f64 / 60.0)
    }

    pub(crate) fn next_comment_id(&self) -> String {
        next_sequential(self.comments.iter().map(|c| c.id.as_str()))
    }

    pub(crate) fn next_history_id(&self) -> String {
        next_sequential(self.history.iter().map(|h| h.id.as_str()))
    }
}

/// `max(numeric ids) + 1`; non-numeric ids count as zero.
pub(crate) fn next_sequential<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let max = ids.filter_map(|id| id.parse::<u64>().ok()).max();
    match max {
        Some(n) => (n + 1).to_string(),
        None => "1".to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    #[serde(with = "stamp")]
    pub at: NaiveDateTime,
}

/// Kind tag for a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HistoryKind {
    Creation,
    Assignment,
    Status,
    Priority,
    Comment,
    Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub id: String,
    pub kind: HistoryKind,
    pub author: String,
    pub description: String,
    #[serde(with = "stamp")]
    pub at: NaiveDateTime,
}

/// A file stored alongside a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    #[serde(with = "stamp")]
    pub added_at: NaiveDateTime,
    /// Base64 payload, when kept inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// One entry of a ticket's merged activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub kind: HistoryKind,
    pub author: String,
    pub description: String,
    #[serde(with = "stamp")]
    pub at: NaiveDateTime,
}

// ── Creation input ───────────────────────────────────────────────────

/// Fields supplied by the caller when inserting a ticket. The store assigns
/// the id, timestamps and the initial comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    pub status: Status,
    pub created_by: String,
    pub assignee: Option<String>,
    pub location: Option<String>,
    pub equipment: Option<String>,
    pub requester_email: Option<String>,
    pub requester_phone: Option<String>,
    pub in_review: bool,
}

impl NewTicket {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            created_by: created_by.into(),
            ..Self::default()
        }
    }
}
