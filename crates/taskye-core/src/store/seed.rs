// Built-in datasets used when no snapshot exists or the snapshot is corrupt.

use tracing::warn;

use crate::model::{InventoryItem, Ticket};

const TICKETS: &str = include_str!("seed/tickets.json");
const INVENTORY: &str = include_str!("seed/inventory.json");

pub fn tickets() -> Vec<Ticket> {
    serde_json::from_str(TICKETS).unwrap_or_else(|e| {
        warn!(error = %e, "built-in ticket dataset is unreadable");
        Vec::new()
    })
}

pub fn inventory() -> Vec<InventoryItem> {
    serde_json::from_str(INVENTORY).unwrap_or_else(|e| {
        warn!(error = %e, "built-in inventory dataset is unreadable");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    #[test]
    fn seed_datasets_parse() {
        let tickets = tickets();
        assert_eq!(tickets.len(), 47);
        assert!(
            tickets
                .iter()
                .filter(|t| t.status == Status::Resolved)
                .all(|t| t.resolved_at.is_some())
        );
        assert_eq!(inventory().len(), 10);
    }
}
