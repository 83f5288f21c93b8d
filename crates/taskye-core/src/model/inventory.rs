// ── Inventory domain types ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ItemKind {
    #[serde(alias = "Computador")]
    #[strum(to_string = "Computer", serialize = "computador")]
    Computer,
    Monitor,
    #[serde(alias = "Impressora")]
    #[strum(to_string = "Printer", serialize = "impressora")]
    Printer,
    #[serde(alias = "Servidor")]
    #[strum(to_string = "Server", serialize = "servidor")]
    Server,
    #[serde(alias = "Notebook")]
    #[strum(to_string = "Laptop", serialize = "notebook")]
    Laptop,
    #[serde(alias = "Outros")]
    #[strum(to_string = "Other", serialize = "outros")]
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ItemStatus {
    #[serde(alias = "Disponível")]
    #[strum(to_string = "Available", serialize = "disponível")]
    Available,
    #[serde(alias = "Em Uso")]
    #[strum(
        to_string = "In Use",
        serialize = "inuse",
        serialize = "in-use",
        serialize = "in_use",
        serialize = "em uso"
    )]
    InUse,
    #[serde(alias = "Manutenção")]
    #[strum(to_string = "Maintenance", serialize = "manutenção")]
    Maintenance,
    #[serde(alias = "Obsoleto")]
    #[strum(to_string = "Obsolete", serialize = "obsoleto")]
    Obsolete,
}

/// A tracked asset. `warranty` is the expiry date; `None` means expired or
/// never covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub serial: String,
    #[serde(default)]
    pub warranty: Option<NaiveDate>,
}

impl InventoryItem {
    pub fn warranty_active(&self, today: NaiveDate) -> bool {
        self.warranty.is_some_and(|until| until >= today)
    }
}

/// Store input for a new asset; the store assigns the `INV-###` id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventoryItem {
    pub name: String,
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub location: String,
    pub assigned_to: Option<String>,
    pub serial: String,
    pub warranty: Option<NaiveDate>,
}
