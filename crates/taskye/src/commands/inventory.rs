//! Inventory command handlers.

use chrono::Utc;
use tabled::Tabled;

use taskye_core::{CoreError, InventoryItem, ItemKind, ItemStatus, NewInventoryItem};

use crate::cli::{AddItemArgs, InventoryArgs, InventoryCommand};
use crate::error::CliError;
use crate::output;

use super::Context;
use super::util::{self, or_dash};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Assigned to")]
    assigned_to: String,
    #[tabled(rename = "Warranty")]
    warranty: String,
}

fn warranty_label(item: &InventoryItem) -> String {
    let today = Utc::now().date_naive();
    match item.warranty {
        Some(until) if item.warranty_active(today) => format!("until {until}"),
        Some(until) => format!("expired {until}"),
        None => "expired".into(),
    }
}

impl From<&InventoryItem> for ItemRow {
    fn from(i: &InventoryItem) -> Self {
        Self {
            id: i.id.clone(),
            name: output::truncate(&i.name, 36),
            kind: i.kind.to_string(),
            status: i.status.to_string(),
            location: i.location.clone(),
            assigned_to: or_dash(i.assigned_to.as_deref()).to_owned(),
            warranty: warranty_label(i),
        }
    }
}

fn detail(i: &InventoryItem) -> String {
    [
        format!("ID:          {}", i.id),
        format!("Name:        {}", i.name),
        format!("Kind:        {}", i.kind),
        format!("Status:      {}", i.status),
        format!("Location:    {}", i.location),
        format!("Assigned to: {}", or_dash(i.assigned_to.as_deref())),
        format!("Serial:      {}", i.serial),
        format!("Warranty:    {}", warranty_label(i)),
    ]
    .join("\n")
}

fn new_item(args: AddItemArgs) -> Result<NewInventoryItem, CliError> {
    let warranty = args
        .warranty
        .as_deref()
        .map(|raw| util::parse_date("warranty", raw))
        .transpose()?;
    Ok(NewInventoryItem {
        name: args.name,
        kind: args.kind.into(),
        status: args.status.into(),
        location: args.location,
        assigned_to: args.assigned_to,
        serial: args.serial,
        warranty,
    })
}

fn print_item(ctx: &Context<'_>, item: &InventoryItem) -> Result<(), CliError> {
    let out = output::render_single(ctx.global.output, item, detail, |i| i.id.clone())?;
    ctx.print(&out);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: InventoryArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let mut store = ctx.inventory();

    match args.command {
        InventoryCommand::List {
            kind,
            status,
            search,
        } => {
            let needle = search.map(|s| s.to_lowercase());
            let selected: Vec<&InventoryItem> = store
                .list()
                .iter()
                .filter(|i| kind.is_none_or(|k| i.kind == ItemKind::from(k)))
                .filter(|i| status.is_none_or(|s| i.status == ItemStatus::from(s)))
                .filter(|i| {
                    needle.as_deref().is_none_or(|n| {
                        [&i.id, &i.name, &i.serial, &i.location]
                            .iter()
                            .any(|field| field.to_lowercase().contains(n))
                    })
                })
                .collect();
            let out = output::render_list(
                ctx.global.output,
                &selected,
                |i| ItemRow::from(*i),
                |i| i.id.clone(),
            )?;
            ctx.print(&out);
            Ok(())
        }

        InventoryCommand::Show { id } => {
            let item = store
                .get(&id)
                .ok_or(CoreError::InventoryItemNotFound { id })?;
            print_item(ctx, item)
        }

        InventoryCommand::Add(add) => {
            let item = store.add(new_item(add)?)?;
            ctx.note(&format!("✓ Asset {} registered", item.id));
            print_item(ctx, &item)
        }

        InventoryCommand::SetStatus { id, status } => {
            let item = store.set_status(&id, status.into())?;
            ctx.note(&format!("✓ Asset {} is now {}", item.id, item.status));
            print_item(ctx, &item)
        }

        InventoryCommand::Remove { id } => {
            let item = store
                .get(&id)
                .cloned()
                .ok_or_else(|| CoreError::InventoryItemNotFound { id: id.clone() })?;
            if !util::confirm(
                &format!("Remove asset {} ({})?", item.id, item.name),
                ctx.global.yes,
                "inventory remove",
            )? {
                return Ok(());
            }
            let removed = store.remove(&id)?;
            ctx.note(&format!("✓ Asset {} removed", removed.id));
            Ok(())
        }
    }
}
