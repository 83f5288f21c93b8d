// ── Stores ──
//
// Explicitly constructed service objects over a shared snapshot port. Each
// keeps its collection in memory and rewrites its snapshot after every
// mutation.

mod inventory;
pub(crate) mod seed;
mod session;
pub mod snapshot;
mod tickets;

pub use inventory::InventoryStore;
pub use session::SessionStore;
pub use snapshot::{FileSnapshots, MemorySnapshots, SnapshotPort, keys};
pub use tickets::TicketStore;
