//! Ticket command handlers.

use serde::Serialize;
use tabled::Tabled;

use taskye_core::model::stamp;
use taskye_core::{
    Attachment, Category, NewTicket, Priority, Status, Ticket, TicketStore, TimelineEntry, User,
};

use crate::cli::{CreateTicketArgs, TicketFilterArgs, TicketsArgs, TicketsCommand};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::Context;
use super::util::or_dash;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl TicketRow {
    pub(crate) fn new(t: &Ticket, painter: Painter) -> Self {
        Self {
            id: t.id.clone(),
            title: output::truncate(&t.title, 48),
            priority: painter.priority(t.priority),
            status: painter.status(t.status),
            category: t.category.to_string(),
            assignee: or_dash(t.assignee.as_deref()).to_owned(),
            updated: stamp::format(&t.updated_at),
        }
    }
}

/// Ticket plus its merged activity feed, for `tickets show`.
#[derive(Serialize)]
struct TicketDetail<'a> {
    #[serde(flatten)]
    ticket: &'a Ticket,
    timeline: Vec<TimelineEntry>,
}

fn detail(d: &TicketDetail<'_>, painter: Painter) -> String {
    let t = d.ticket;
    let mut lines = vec![
        format!("ID:          {}", t.id),
        format!("Title:       {}", t.title),
        format!("Priority:    {}", painter.priority(t.priority)),
        format!("Status:      {}", painter.status(t.status)),
        format!("Category:    {}", t.category),
        format!("Created by:  {}", t.created_by),
        format!("Created:     {}", stamp::format(&t.created_at)),
        format!("Updated:     {}", stamp::format(&t.updated_at)),
        format!(
            "Resolved:    {}",
            t.resolved_at.as_ref().map_or_else(|| "-".to_owned(), stamp::format)
        ),
        format!("Assignee:    {}", or_dash(t.assignee.as_deref())),
        format!("Location:    {}", or_dash(t.location.as_deref())),
        format!("Equipment:   {}", or_dash(t.equipment.as_deref())),
        format!("Requester:   {}", or_dash(t.requester_email.as_deref())),
        format!("Phone:       {}", or_dash(t.requester_phone.as_deref())),
    ];
    if t.in_review {
        lines.push("Review:      awaiting review".into());
    }

    lines.push(String::new());
    lines.push(painter.heading("Description"));
    lines.push(t.description.clone());

    if !t.attachments.is_empty() {
        lines.push(String::new());
        lines.push(painter.heading("Attachments"));
        for a in &t.attachments {
            lines.push(format!(
                "  #{} {} ({}, {} bytes)",
                a.id, a.name, a.mime_type, a.size_bytes
            ));
        }
    }

    if !t.comments.is_empty() {
        lines.push(String::new());
        lines.push(painter.heading("Comments"));
        for c in &t.comments {
            lines.push(format!(
                "  #{} {} · {}: {}",
                c.id,
                stamp::format(&c.at),
                c.author,
                c.text
            ));
        }
    }

    lines.push(String::new());
    lines.push(painter.heading("Timeline"));
    for e in &d.timeline {
        lines.push(format!(
            "  {}  {:<10} {}: {}",
            stamp::format(&e.at),
            e.kind,
            e.author,
            e.description
        ));
    }
    lines.join("\n")
}

fn matches(t: &Ticket, filter: &TicketFilterArgs, user: &User) -> bool {
    if filter.status.is_some_and(|s| t.status != Status::from(s)) {
        return false;
    }
    if filter.priority.is_some_and(|p| t.priority != Priority::from(p)) {
        return false;
    }
    if filter.category.is_some_and(|c| t.category != Category::from(c)) {
        return false;
    }
    if filter.mine && t.created_by != user.name {
        return false;
    }
    if let Some(ref needle) = filter.search {
        let needle = needle.to_lowercase();
        return t.id == needle
            || t.title.to_lowercase().contains(&needle)
            || t.description.to_lowercase().contains(&needle);
    }
    true
}

fn print_ticket(ctx: &Context<'_>, ticket: &Ticket) -> Result<(), CliError> {
    let painter = ctx.painter();
    let out = output::render_list(
        ctx.global.output,
        std::slice::from_ref(ticket),
        |t| TicketRow::new(t, painter),
        |t| t.id.clone(),
    )?;
    ctx.print(&out);
    Ok(())
}

fn create(
    store: &mut TicketStore,
    args: CreateTicketArgs,
    user: &User,
) -> Result<Ticket, CliError> {
    // Validate the attachment before anything is persisted.
    let attachment = args
        .attach
        .as_deref()
        .map(Attachment::from_path)
        .transpose()?;

    let new = NewTicket {
        priority: args.priority.into(),
        category: args.category.into(),
        assignee: args.assignee,
        location: args.location,
        equipment: args.equipment,
        requester_email: args.requester_email.or_else(|| Some(user.email.clone())),
        requester_phone: args.requester_phone,
        ..NewTicket::new(args.title, args.description, user.name.clone())
    };
    let ticket = store.insert(new)?;

    if let Some(attachment) = attachment {
        store.attach(&ticket.id, attachment.to_ref(store.stamp_now()))?;
    }
    Ok(store.require(&ticket.id)?.clone())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: TicketsArgs, ctx: &Context<'_>, user: &User) -> Result<(), CliError> {
    let mut store = ctx.tickets();
    let actor = user.name.as_str();

    match args.command {
        TicketsCommand::List(filter) => {
            let painter = ctx.painter();
            let selected: Vec<&Ticket> = store
                .tickets()
                .iter()
                .filter(|t| matches(t, &filter, user))
                .collect();
            let out = output::render_list(
                ctx.global.output,
                &selected,
                |t| TicketRow::new(t, painter),
                |t| t.id.clone(),
            )?;
            ctx.print(&out);
            Ok(())
        }

        TicketsCommand::Show { id } => {
            let painter = ctx.painter();
            let detail_view = TicketDetail {
                timeline: store.timeline(&id)?,
                ticket: store.require(&id)?,
            };
            let out = output::render_single(
                ctx.global.output,
                &detail_view,
                |d| detail(d, painter),
                |d| d.ticket.id.clone(),
            )?;
            ctx.print(&out);
            Ok(())
        }

        TicketsCommand::Create(create_args) => {
            let ticket = create(&mut store, create_args, user)?;
            ctx.note(&format!("✓ Ticket #{} created", ticket.id));
            print_ticket(ctx, &ticket)
        }

        TicketsCommand::Status { id, status } => {
            let ticket = store.set_status(&id, status.into(), actor)?;
            ctx.note(&format!("✓ Ticket #{id} is now {}", ticket.status));
            print_ticket(ctx, &ticket)
        }

        TicketsCommand::Priority { id, priority } => {
            let ticket = store.set_priority(&id, priority.into(), actor)?;
            ctx.note(&format!("✓ Ticket #{id} priority set to {}", ticket.priority));
            print_ticket(ctx, &ticket)
        }

        TicketsCommand::Assign {
            id,
            assignee,
            clear,
        } => {
            let assignee = if clear { None } else { assignee };
            let ticket = store.assign(&id, assignee.as_deref(), actor)?;
            match ticket.assignee.as_deref() {
                Some(name) => ctx.note(&format!("✓ Ticket #{id} assigned to {name}")),
                None => ctx.note(&format!("✓ Ticket #{id} unassigned")),
            }
            print_ticket(ctx, &ticket)
        }

        TicketsCommand::Resolve { id, note } => {
            let ticket = store.resolve(&id, actor, note.as_deref())?;
            ctx.note(&format!("✓ Ticket #{id} resolved"));
            print_ticket(ctx, &ticket)
        }

        TicketsCommand::Comment { id, text } => {
            let comment = store.add_comment(&id, actor, &text)?;
            ctx.note(&format!("✓ Comment #{} added to ticket #{id}", comment.id));
            let out = output::render_single(
                ctx.global.output,
                &comment,
                |c| format!("#{} {}: {}", c.id, c.author, c.text),
                |c| c.id.clone(),
            )?;
            ctx.print(&out);
            Ok(())
        }

        TicketsCommand::Uncomment { id, comment_id } => {
            store.remove_comment(&id, &comment_id)?;
            ctx.note(&format!("✓ Comment #{comment_id} removed from ticket #{id}"));
            Ok(())
        }
    }
}
