// ── Kanban board ──
//
// Five lanes projected from ticket status plus the `in_review` flag:
//
//   Backlog     Waiting, not in review
//   Todo        Open
//   InProgress  In Progress
//   Review      in_review (stored as Waiting)
//   Done        Resolved

use chrono::NaiveDateTime;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::model::{Status, Ticket};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Lane {
    Backlog,
    #[strum(to_string = "todo", serialize = "to-do")]
    Todo,
    InProgress,
    Review,
    Done,
}

impl Lane {
    /// The lane a ticket is displayed in.
    pub fn of(ticket: &Ticket) -> Self {
        if ticket.in_review {
            return Self::Review;
        }
        match ticket.status {
            Status::Waiting => Self::Backlog,
            Status::Open => Self::Todo,
            Status::InProgress => Self::InProgress,
            Status::Resolved => Self::Done,
        }
    }

    /// Status a ticket takes when dropped into this lane.
    pub fn status(self) -> Status {
        match self {
            Self::Backlog | Self::Review => Status::Waiting,
            Self::Todo => Status::Open,
            Self::InProgress => Status::InProgress,
            Self::Done => Status::Resolved,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "In Review",
            Self::Done => "Done",
        }
    }

    /// Rewrite `ticket` as if dropped into this lane at `now`.
    pub(crate) fn apply(self, ticket: &mut Ticket, now: NaiveDateTime) {
        ticket.status = self.status();
        ticket.in_review = self == Self::Review;
        if self == Self::Done && ticket.resolved_at.is_none() {
            ticket.resolved_at = Some(now);
        }
        ticket.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub lane: Lane,
    pub title: &'static str,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    /// Group tickets into lanes, preserving store order within each lane.
    pub fn build(tickets: &[Ticket]) -> Self {
        let columns = Lane::iter()
            .map(|lane| Column {
                lane,
                title: lane.title(),
                tickets: tickets
                    .iter()
                    .filter(|t| Lane::of(t) == lane)
                    .cloned()
                    .collect(),
            })
            .collect();
        Self { columns }
    }

    pub fn column(&self, lane: Lane) -> Option<&Column> {
        self.columns.iter().find(|c| c.lane == lane)
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.tickets.len()).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;

    use super::*;
    use crate::model::{NewTicket, fixed_clock, stamp};
    use crate::store::{MemorySnapshots, TicketStore};

    #[test]
    fn seed_board_partitions_every_ticket() {
        let store = TicketStore::open(Arc::new(MemorySnapshots::new()));
        let board = Board::build(store.tickets());

        assert_eq!(board.total(), store.tickets().len());
        assert_eq!(board.column(Lane::Todo).unwrap().tickets.len(), 14);
        assert_eq!(board.column(Lane::Backlog).unwrap().tickets.len(), 10);
        assert_eq!(board.column(Lane::InProgress).unwrap().tickets.len(), 11);
        assert_eq!(board.column(Lane::Done).unwrap().tickets.len(), 12);
        assert!(board.column(Lane::Review).unwrap().tickets.is_empty());
    }

    #[test]
    fn moving_through_review_to_done() {
        let now = stamp::parse("2025-12-04 16:20").unwrap();
        let port = Arc::new(MemorySnapshots::new());
        let mut store = TicketStore::with_clock(port, fixed_clock(now));
        let t = store
            .insert(NewTicket::new("VPN drops", "Disconnects hourly", "Ana"))
            .unwrap();

        let reviewed = store.move_to(&t.id, Lane::Review, "Tech").unwrap();
        assert_eq!(reviewed.status, Status::Waiting);
        assert!(reviewed.in_review);
        assert_eq!(Lane::of(&reviewed), Lane::Review);

        let done = store.move_to(&t.id, Lane::Done, "Tech").unwrap();
        assert!(!done.in_review);
        assert_eq!(done.status, Status::Resolved);
        assert_eq!(done.resolved_at, Some(now));

        let back = store.move_to(&t.id, Lane::Backlog, "Tech").unwrap();
        assert_eq!(Lane::of(&back), Lane::Backlog);
        assert_eq!(back.resolved_at, Some(now));
    }

    #[test]
    fn lanes_parse_from_cli_names() {
        assert_eq!(Lane::from_str("in-progress").unwrap(), Lane::InProgress);
        assert_eq!(Lane::from_str("TODO").unwrap(), Lane::Todo);
        assert_eq!(Lane::Review.to_string(), "review");
    }
}
