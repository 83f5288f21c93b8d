//! Kanban board command handlers.

use tabled::Tabled;

use taskye_core::board::Column;
use taskye_core::{Board, Lane, User};

use crate::cli::{BoardArgs, BoardCommand, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::Context;
use super::tickets::TicketRow;

#[derive(Tabled)]
struct LaneRow {
    #[tabled(rename = "Lane")]
    lane: String,
    #[tabled(rename = "Tickets")]
    count: usize,
}

fn render_columns(columns: &[&Column], painter: Painter) -> String {
    let mut sections = Vec::with_capacity(columns.len());
    for column in columns {
        let heading = painter.heading(&format!("{} ({})", column.title, column.tickets.len()));
        if column.tickets.is_empty() {
            sections.push(format!("{heading}\n  (empty)"));
        } else {
            let rows: Vec<TicketRow> = column
                .tickets
                .iter()
                .map(|t| TicketRow::new(t, painter))
                .collect();
            sections.push(format!("{heading}\n{}", output::render_table(&rows)));
        }
    }
    sections.join("\n\n")
}

pub fn handle(args: BoardArgs, ctx: &Context<'_>, user: &User) -> Result<(), CliError> {
    match args.command {
        BoardCommand::Show { lane } => {
            let store = ctx.tickets();
            let board = Board::build(store.tickets());
            let columns: Vec<&Column> = match lane {
                Some(lane) => board.column(lane.into()).into_iter().collect(),
                None => board.columns.iter().collect(),
            };

            let out = match ctx.global.output {
                OutputFormat::Table => render_columns(&columns, ctx.painter()),
                OutputFormat::Plain => {
                    let rows: Vec<String> = columns
                        .iter()
                        .flat_map(|c| c.tickets.iter().map(move |t| format!("{}\t{}", c.lane, t.id)))
                        .collect();
                    rows.join("\n")
                }
                format => output::render_single(format, &columns, |_| String::new(), |_| String::new())?,
            };
            ctx.print(&out);

            if matches!(ctx.global.output, OutputFormat::Table) && lane.is_none() {
                let summary: Vec<LaneRow> = board
                    .columns
                    .iter()
                    .map(|c| LaneRow {
                        lane: c.lane.to_string(),
                        count: c.tickets.len(),
                    })
                    .collect();
                ctx.print(&format!(
                    "\n{}\nTotal: {}",
                    output::render_table(&summary),
                    board.total()
                ));
            }
            Ok(())
        }

        BoardCommand::Move { id, lane } => {
            let lane = Lane::from(lane);
            let mut store = ctx.tickets();
            let ticket = store.move_to(&id, lane, &user.name)?;
            ctx.note(&format!(
                "✓ Ticket #{id} moved to {} ({})",
                lane.title(),
                ticket.status
            ));
            Ok(())
        }
    }
}
