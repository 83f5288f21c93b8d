//! Dashboard command handler.

use tabled::Tabled;

use taskye_core::dashboard::{self, Bucket, DashboardMetrics};
use taskye_core::DashboardFilter;

use crate::cli::DashboardArgs;
use crate::error::CliError;
use crate::output::{self, Painter};

use super::Context;

#[derive(Tabled)]
struct BucketRow<'a> {
    #[tabled(rename = "Group")]
    group: &'a str,
    #[tabled(rename = "Label")]
    label: &'a str,
    #[tabled(rename = "Tickets")]
    count: usize,
}

fn detail(m: &DashboardMetrics, painter: Painter) -> String {
    let summary = [
        format!("Total tickets:        {}", m.total),
        format!("Open:                 {}", m.open),
        format!("Resolved:             {}", m.resolved),
        format!("Avg. resolution time: {:.1}h", m.avg_resolution_hours),
        format!("SLA:                  {}%", m.sla_percent),
    ]
    .join("\n");

    let groups: [(&str, &[Bucket]); 3] = [
        ("Status", &m.by_status),
        ("Priority", &m.by_priority),
        ("Category", &m.by_category),
    ];
    let rows: Vec<BucketRow<'_>> = groups
        .into_iter()
        .flat_map(|(group, buckets)| {
            buckets.iter().map(move |b| BucketRow {
                group,
                label: &b.label,
                count: b.count,
            })
        })
        .collect();

    format!(
        "{}\n{summary}\n\n{}",
        painter.heading("Dashboard"),
        output::render_table(&rows)
    )
}

pub fn handle(args: &DashboardArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let filter = DashboardFilter {
        scope: args.scope.into(),
        priority: args.priority.map(Into::into),
        period: args.period.into(),
    };

    let store = ctx.tickets();
    let metrics = dashboard::metrics(store.tickets(), &filter, store.stamp_now());

    let painter = ctx.painter();
    let out = output::render_single(
        ctx.global.output,
        &metrics,
        |m| detail(m, painter),
        |m| format!("{}\t{}\t{}\t{}%", m.total, m.open, m.resolved, m.sla_percent),
    )?;
    ctx.print(&out);
    Ok(())
}
