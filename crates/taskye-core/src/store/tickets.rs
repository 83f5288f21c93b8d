// ── Ticket store ──
//
// Ordered, in-memory ticket collection persisted as a single snapshot after
// every mutation. Mutations run to completion synchronously; callers own
// the store mutably, so there is nothing to lock.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use super::seed;
use super::snapshot::{SnapshotPort, keys};
use crate::board::Lane;
use crate::error::CoreError;
use crate::model::ticket::next_sequential;
use crate::model::{
    AttachmentRef, Clock, Comment, HistoryEvent, HistoryKind, NewTicket, Priority, Status, Ticket,
    TimelineEntry, system_clock,
};

pub struct TicketStore {
    port: Arc<dyn SnapshotPort>,
    clock: Clock,
    tickets: Vec<Ticket>,
}

impl TicketStore {
    // ── Construction ─────────────────────────────────────────────────

    /// Load the ticket snapshot. A missing, unreadable or corrupt snapshot
    /// is logged and replaced by the built-in dataset.
    pub fn open(port: Arc<dyn SnapshotPort>) -> Self {
        Self::with_clock(port, system_clock())
    }

    pub fn with_clock(port: Arc<dyn SnapshotPort>, clock: Clock) -> Self {
        let tickets = match port.load(keys::TICKETS) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "corrupt ticket snapshot, using built-in tickets");
                seed::tickets()
            }),
            Ok(None) => seed::tickets(),
            Err(e) => {
                warn!(error = %e, "ticket snapshot unreadable, using built-in tickets");
                seed::tickets()
            }
        };
        Self {
            port,
            clock,
            tickets,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Snapshot copy of every ticket, in insertion order.
    pub fn list(&self) -> Vec<Ticket> {
        self.tickets.clone()
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Ticket, CoreError> {
        self.get(id).ok_or_else(|| not_found(id))
    }

    /// History merged with comments, oldest first. Tickets without recorded
    /// history get a synthesized creation entry.
    pub fn timeline(&self, id: &str) -> Result<Vec<TimelineEntry>, CoreError> {
        let ticket = self.require(id)?;

        let mut entries: Vec<TimelineEntry> = ticket
            .history
            .iter()
            .map(|h| TimelineEntry {
                kind: h.kind,
                author: h.author.clone(),
                description: h.description.clone(),
                at: h.at,
            })
            .collect();

        if entries.is_empty() {
            entries.push(TimelineEntry {
                kind: HistoryKind::Creation,
                author: ticket.created_by.clone(),
                description: "Ticket created".into(),
                at: ticket.created_at,
            });
        }

        entries.extend(ticket.comments.iter().map(|c| TimelineEntry {
            kind: HistoryKind::Comment,
            author: c.author.clone(),
            description: c.text.clone(),
            at: c.at,
        }));

        entries.sort_by_key(|e| e.at);
        Ok(entries)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Insert a ticket: assigns the next sequential id, stamps creation and
    /// update times, and seeds the thread with the description.
    pub fn insert(&mut self, new: NewTicket) -> Result<Ticket, CoreError> {
        if new.title.trim().is_empty() {
            return Err(CoreError::validation("ticket title must not be empty"));
        }
        if new.description.trim().is_empty() {
            return Err(CoreError::validation("ticket description must not be empty"));
        }

        let rollback = self.tickets.clone();
        let now = self.now();
        let id = next_sequential(self.tickets.iter().map(|t| t.id.as_str()));
        let resolved_at = (new.status == Status::Resolved).then_some(now);

        let ticket = Ticket {
            id,
            comments: vec![Comment {
                id: "0".into(),
                author: new.created_by.clone(),
                text: new.description.clone(),
                at: now,
            }],
            title: new.title,
            description: new.description,
            priority: new.priority,
            status: new.status,
            category: new.category,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
            resolved_at,
            assignee: new.assignee,
            location: new.location,
            equipment: new.equipment,
            requester_email: new.requester_email,
            requester_phone: new.requester_phone,
            in_review: new.in_review,
            history: Vec::new(),
            attachments: Vec::new(),
        };

        self.tickets.push(ticket.clone());
        self.commit(rollback)?;
        info!(id = %ticket.id, title = %ticket.title, "ticket created");
        Ok(ticket)
    }

    /// Full replace by id. Refreshes `updated_at`; stamps `resolved_at` on
    /// entry into `Resolved` and never clears an existing stamp.
    pub fn update(&mut self, mut ticket: Ticket) -> Result<(), CoreError> {
        let rollback = self.tickets.clone();
        let now = self.now();
        let slot = self
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket.id)
            .ok_or_else(|| not_found(&ticket.id))?;

        if ticket.resolved_at.is_none() {
            ticket.resolved_at = slot.resolved_at;
        }
        if ticket.status == Status::Resolved && ticket.resolved_at.is_none() {
            ticket.resolved_at = Some(now);
        }
        ticket.updated_at = now;
        *slot = ticket;

        self.commit(rollback)
    }

    pub fn add_comment(
        &mut self,
        id: &str,
        author: &str,
        text: &str,
    ) -> Result<Comment, CoreError> {
        if text.trim().is_empty() {
            return Err(CoreError::validation("comment text must not be empty"));
        }
        let rollback = self.tickets.clone();
        let now = self.now();
        let ticket = self.find_mut(id)?;

        let comment = Comment {
            id: ticket.next_comment_id(),
            author: author.to_owned(),
            text: text.to_owned(),
            at: now,
        };
        ticket.comments.push(comment.clone());
        ticket.updated_at = now;

        self.commit(rollback)?;
        Ok(comment)
    }

    pub fn remove_comment(&mut self, id: &str, comment_id: &str) -> Result<(), CoreError> {
        let rollback = self.tickets.clone();
        let now = self.now();
        let ticket = self.find_mut(id)?;

        let before = ticket.comments.len();
        ticket.comments.retain(|c| c.id != comment_id);
        if ticket.comments.len() == before {
            return Err(CoreError::CommentNotFound {
                ticket_id: id.to_owned(),
                comment_id: comment_id.to_owned(),
            });
        }
        ticket.updated_at = now;

        self.commit(rollback)
    }

    pub fn set_status(
        &mut self,
        id: &str,
        status: Status,
        actor: &str,
    ) -> Result<Ticket, CoreError> {
        let rollback = self.tickets.clone();
        let now = self.now();
        let ticket = self.find_mut(id)?;

        let previous = ticket.status;
        ticket.status = status;
        if status != Status::Waiting {
            ticket.in_review = false;
        }
        if status == Status::Resolved && ticket.resolved_at.is_none() {
            ticket.resolved_at = Some(now);
        }
        if previous != status {
            record(
                ticket,
                HistoryKind::Status,
                actor,
                format!("Status changed from {previous} to {status}"),
                now,
            );
        }
        ticket.updated_at = now;

        let snapshot = ticket.clone();
        self.commit(rollback)?;
        Ok(snapshot)
    }

    pub fn set_priority(
        &mut self,
        id: &str,
        priority: Priority,
        actor: &str,
    ) -> Result<Ticket, CoreError> {
        let rollback = self.tickets.clone();
        let now = self.now();
        let ticket = self.find_mut(id)?;

        let previous = ticket.priority;
        ticket.priority = priority;
        if previous != priority {
            record(
                ticket,
                HistoryKind::Priority,
                actor,
                format!("Priority changed from {previous} to {priority}"),
                now,
            );
        }
        ticket.updated_at = now;

        let snapshot = ticket.clone();
        self.commit(rollback)?;
        Ok(snapshot)
    }

    /// Assign to `assignee`, or unassign with `None`.
    pub fn assign(
        &mut self,
        id: &str,
        assignee: Option<&str>,
        actor: &str,
    ) -> Result<Ticket, CoreError> {
        let rollback = self.tickets.clone();
        let now = self.now();
        let ticket = self.find_mut(id)?;

        ticket.assignee = assignee.map(str::to_owned);
        let description = match assignee {
            Some(name) => format!("Assigned to {name}"),
            None => "Assignment cleared".to_owned(),
        };
        record(ticket, HistoryKind::Assignment, actor, description, now);
        ticket.updated_at = now;

        let snapshot = ticket.clone();
        self.commit(rollback)?;
        Ok(snapshot)
    }

    pub fn resolve(
        &mut self,
        id: &str,
        actor: &str,
        note: Option<&str>,
    ) -> Result<Ticket, CoreError> {
        let rollback = self.tickets.clone();
        let now = self.now();
        let ticket = self.find_mut(id)?;

        ticket.status = Status::Resolved;
        ticket.in_review = false;
        if ticket.resolved_at.is_none() {
            ticket.resolved_at = Some(now);
        }
        let description = note
            .filter(|n| !n.trim().is_empty())
            .map_or_else(|| "Ticket resolved".to_owned(), str::to_owned);
        record(ticket, HistoryKind::Resolution, actor, description, now);
        ticket.updated_at = now;

        let snapshot = ticket.clone();
        self.commit(rollback)?;
        info!(id, "ticket resolved");
        Ok(snapshot)
    }

    /// Move a ticket to a kanban lane.
    pub fn move_to(&mut self, id: &str, lane: Lane, actor: &str) -> Result<Ticket, CoreError> {
        let rollback = self.tickets.clone();
        let now = self.now();
        let ticket = self.find_mut(id)?;

        let previous = ticket.status;
        lane.apply(ticket, now);
        if previous != ticket.status {
            let description = format!("Status changed from {previous} to {}", ticket.status);
            record(ticket, HistoryKind::Status, actor, description, now);
        }

        let snapshot = ticket.clone();
        self.commit(rollback)?;
        info!(id, %lane, "ticket moved");
        Ok(snapshot)
    }

    pub fn attach(&mut self, id: &str, attachment: AttachmentRef) -> Result<(), CoreError> {
        let rollback = self.tickets.clone();
        let now = self.now();
        let ticket = self.find_mut(id)?;

        let mut attachment = attachment;
        attachment.id = next_sequential(ticket.attachments.iter().map(|a| a.id.as_str()));
        ticket.attachments.push(attachment);
        ticket.updated_at = now;

        self.commit(rollback)
    }

    /// Current time according to the store clock.
    pub fn stamp_now(&self) -> NaiveDateTime {
        self.now()
    }

    // ── Internals ────────────────────────────────────────────────────

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Ticket, CoreError> {
        self.tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Persist the collection, restoring `rollback` when the save fails.
    fn commit(&mut self, rollback: Vec<Ticket>) -> Result<(), CoreError> {
        let saved = self.persist();
        if saved.is_err() {
            self.tickets = rollback;
        }
        saved
    }

    fn persist(&self) -> Result<(), CoreError> {
        let raw = serde_json::to_string_pretty(&self.tickets)
            .map_err(|e| CoreError::storage(keys::TICKETS, e))?;
        self.port.save(keys::TICKETS, &raw)
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::TicketNotFound { id: id.to_owned() }
}

fn record(
    ticket: &mut Ticket,
    kind: HistoryKind,
    actor: &str,
    description: String,
    at: NaiveDateTime,
) {
    let event = HistoryEvent {
        id: ticket.next_history_id(),
        kind,
        author: actor.to_owned(),
        description,
        at,
    };
    ticket.history.push(event);
}
