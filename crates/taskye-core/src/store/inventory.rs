// ── Inventory store ──

use std::sync::Arc;

use tracing::{info, warn};

use super::seed;
use super::snapshot::{SnapshotPort, keys};
use crate::error::CoreError;
use crate::model::{InventoryItem, ItemStatus, NewInventoryItem};

const ID_PREFIX: &str = "INV-";

pub struct InventoryStore {
    port: Arc<dyn SnapshotPort>,
    items: Vec<InventoryItem>,
}

impl InventoryStore {
    /// Load the inventory snapshot, falling back to the built-in asset list.
    pub fn open(port: Arc<dyn SnapshotPort>) -> Self {
        let items = match port.load(keys::INVENTORY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "corrupt inventory snapshot, using built-in assets");
                seed::inventory()
            }),
            Ok(None) => seed::inventory(),
            Err(e) => {
                warn!(error = %e, "inventory snapshot unreadable, using built-in assets");
                seed::inventory()
            }
        };
        Self { port, items }
    }

    pub fn list(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id.eq_ignore_ascii_case(id))
    }

    pub fn add(&mut self, new: NewInventoryItem) -> Result<InventoryItem, CoreError> {
        if new.name.trim().is_empty() {
            return Err(CoreError::validation("item name must not be empty"));
        }

        let rollback = self.items.clone();
        let item = InventoryItem {
            id: self.next_id(),
            name: new.name,
            kind: new.kind,
            status: new.status,
            location: new.location,
            assigned_to: new.assigned_to,
            serial: new.serial,
            warranty: new.warranty,
        };
        self.items.push(item.clone());
        self.commit(rollback)?;

        info!(id = %item.id, name = %item.name, "inventory item added");
        Ok(item)
    }

    /// Full replace by id.
    pub fn update(&mut self, item: InventoryItem) -> Result<(), CoreError> {
        let rollback = self.items.clone();
        let slot = self
            .items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| not_found(&item.id))?;
        *slot = item;
        self.commit(rollback)
    }

    pub fn set_status(&mut self, id: &str, status: ItemStatus) -> Result<InventoryItem, CoreError> {
        let mut item = self.get(id).cloned().ok_or_else(|| not_found(id))?;
        item.status = status;
        self.update(item.clone())?;
        Ok(item)
    }

    pub fn remove(&mut self, id: &str) -> Result<InventoryItem, CoreError> {
        let rollback = self.items.clone();
        let pos = self
            .items
            .iter()
            .position(|i| i.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| not_found(id))?;
        let removed = self.items.remove(pos);
        self.commit(rollback)?;

        info!(id = %removed.id, "inventory item removed");
        Ok(removed)
    }

    /// `INV-` followed by the next number, zero padded to three digits.
    fn next_id(&self) -> String {
        let max = self
            .items
            .iter()
            .filter_map(|i| i.id.strip_prefix(ID_PREFIX)?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{ID_PREFIX}{:03}", max + 1)
    }

    /// Persist the items, restoring `rollback` when the save fails.
    fn commit(&mut self, rollback: Vec<InventoryItem>) -> Result<(), CoreError> {
        let saved = self.persist();
        if saved.is_err() {
            self.items = rollback;
        }
        saved
    }

    fn persist(&self) -> Result<(), CoreError> {
        let raw = serde_json::to_string_pretty(&self.items)
            .map_err(|e| CoreError::storage(keys::INVENTORY, e))?;
        self.port.save(keys::INVENTORY, &raw)
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::InventoryItemNotFound { id: id.to_owned() }
}
