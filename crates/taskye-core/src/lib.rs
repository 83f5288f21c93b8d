// taskye-core: Service-desk domain, snapshot-backed stores, and the AI
// drafting pipeline shared by the CLI.

pub mod assist;
pub mod attachment;
pub mod board;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use assist::{
    AnalysisResult, DraftRequest, DraftSource, Extraction, ModelOption, TextReviewer,
    TicketAssistant, Tier,
};
pub use attachment::Attachment;
pub use board::{Board, Lane};
pub use config::AssistantConfig;
pub use dashboard::{DashboardFilter, DashboardMetrics, Period, Scope};
pub use error::{AssistError, CoreError};
pub use store::{FileSnapshots, InventoryStore, MemorySnapshots, SessionStore, SnapshotPort, TicketStore};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AttachmentRef, Category, Comment, HistoryEvent, HistoryKind, InventoryItem, ItemKind,
    ItemStatus, NewInventoryItem, NewTicket, Priority, Role, Status, Ticket, TicketDraft,
    TimelineEntry, User,
};
