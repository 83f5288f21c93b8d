// ── Service-desk domain model ──
//
// Canonical representations shared by the stores, the board, the dashboard
// and the assistant.

pub mod draft;
pub mod inventory;
pub mod stamp;
pub mod ticket;
pub mod user;

// ── Re-exports ──────────────────────────────────────────────────────

pub use draft::TicketDraft;
pub use inventory::{InventoryItem, ItemKind, ItemStatus, NewInventoryItem};
pub use stamp::{Clock, fixed_clock, system_clock};
pub use ticket::{
    AttachmentRef, Category, Comment, HistoryEvent, HistoryKind, NewTicket, Priority, Status,
    Ticket, TimelineEntry,
};
pub use user::{Role, User, UserRecord, demo_users};
