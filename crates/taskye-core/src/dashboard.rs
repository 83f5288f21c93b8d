// ── Dashboard aggregation ──
//
// Pure functions over a ticket slice. "Now" is injected so period filters
// are deterministic.

use chrono::{Duration, Months, NaiveDateTime};
use serde::Serialize;
use strum::{Display, EnumString, IntoEnumIterator};

use crate::model::{Category, Priority, Status, Ticket};

/// Average resolution time reported when nothing in scope has a stamp.
pub const DEFAULT_AVG_RESOLUTION_HOURS: f64 = 4.2;
/// SLA percentage reported for an empty filtered set.
pub const DEFAULT_SLA_PERCENT: usize = 94;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Scope {
    #[default]
    All,
    Open,
    Resolved,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Period {
    #[default]
    All,
    Today,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardFilter {
    pub scope: Scope,
    pub priority: Option<Priority>,
    pub period: Period,
}

impl DashboardFilter {
    pub fn matches(&self, ticket: &Ticket, now: NaiveDateTime) -> bool {
        let scope_ok = match self.scope {
            Scope::All => true,
            Scope::Open => ticket.status == Status::Open,
            Scope::Resolved => ticket.status == Status::Resolved,
        };
        let priority_ok = self.priority.is_none_or(|p| ticket.priority == p);
        let period_ok = match self.period {
            Period::All => true,
            Period::Today => ticket.created_at.date() == now.date(),
            Period::Week => ticket.created_at >= now - Duration::days(7),
            Period::Month => now
                .checked_sub_months(Months::new(1))
                .is_none_or(|cutoff| ticket.created_at >= cutoff),
        };
        scope_ok && priority_ok && period_ok
    }
}

/// A labelled count for charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total: usize,
    pub open: usize,
    pub resolved: usize,
    pub avg_resolution_hours: f64,
    pub sla_percent: usize,
    pub by_status: Vec<Bucket>,
    pub by_priority: Vec<Bucket>,
    pub by_category: Vec<Bucket>,
}

pub fn filtered<'a>(
    tickets: &'a [Ticket],
    filter: &DashboardFilter,
    now: NaiveDateTime,
) -> Vec<&'a Ticket> {
    tickets.iter().filter(|t| filter.matches(t, now)).collect()
}

pub fn metrics(tickets: &[Ticket], filter: &DashboardFilter, now: NaiveDateTime) -> DashboardMetrics {
    let set = filtered(tickets, filter, now);

    let total = set.len();
    let open = set.iter().filter(|t| t.status == Status::Open).count();
    let resolved = set.iter().filter(|t| t.is_resolved()).count();

    let sla_percent = if total == 0 {
        DEFAULT_SLA_PERCENT
    } else {
        (resolved * 100 + total / 2) / total
    };

    DashboardMetrics {
        total,
        open,
        resolved,
        avg_resolution_hours: average_resolution_hours(&set),
        sla_percent,
        by_status: buckets(&set, Status::iter(), |t| t.status),
        by_priority: buckets(&set, Priority::iter(), |t| t.priority),
        by_category: buckets(&set, Category::iter(), |t| t.category),
    }
}

/// Mean creation-to-resolution time, rounded to one decimal.
#[allow(clippy::cast_precision_loss)]
fn average_resolution_hours(set: &[&Ticket]) -> f64 {
    let hours: Vec<f64> = set
        .iter()
        .filter(|t| t.is_resolved())
        .filter_map(|t| t.resolution_hours())
        .collect();
    if hours.is_empty() {
        return DEFAULT_AVG_RESOLUTION_HOURS;
    }
    let mean = hours.iter().sum::<f64>() / hours.len() as f64;
    (mean * 10.0).round() / 10.0
}

fn buckets<K, I, F>(set: &[&Ticket], keys: I, key_of: F) -> Vec<Bucket>
where
    K: PartialEq + std::fmt::Display,
    I: Iterator<Item = K>,
    F: Fn(&Ticket) -> K,
{
    keys.map(|k| Bucket {
        count: set.iter().filter(|t| key_of(t) == k).count(),
        label: k.to_string(),
    })
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::model::stamp;
    use crate::store::seed;
    use pretty_assertions::assert_eq;

    fn now() -> NaiveDateTime {
        stamp::parse("2025-12-02 20:00").unwrap()
    }

    #[test]
    fn unfiltered_seed_metrics() {
        let tickets = seed::tickets();
        let m = metrics(&tickets, &DashboardFilter::default(), now());
        assert_eq!(m.total, 47);
        assert_eq!(m.open, 14);
        assert_eq!(m.resolved, 12);
        // 12 / 47 = 25.5% → 26
        assert_eq!(m.sla_percent, 26);
        assert_eq!(m.by_status.iter().map(|b| b.count).sum::<usize>(), 47);
        assert_eq!(m.by_category.len(), 5);
    }

    #[test]
    fn empty_set_uses_defaults() {
        let m = metrics(&[], &DashboardFilter::default(), now());
        assert_eq!(m.total, 0);
        assert_eq!(m.sla_percent, DEFAULT_SLA_PERCENT);
        assert_eq!(m.avg_resolution_hours, DEFAULT_AVG_RESOLUTION_HOURS);
    }

    #[test]
    fn resolved_scope_averages_resolution_time() {
        let tickets = seed::tickets();
        let filter = DashboardFilter {
            scope: Scope::Resolved,
            priority: Some(Priority::High),
            ..DashboardFilter::default()
        };
        let m = metrics(&tickets, &filter, now());
        // #13 4.5h, #23 4h, #33 4h, #45 4h
        assert_eq!(m.total, 4);
        assert_eq!(m.sla_percent, 100);
        assert_eq!(m.avg_resolution_hours, 4.1);
    }

    #[test]
    fn period_filters_are_relative_to_now() {
        let tickets = seed::tickets();
        let today = DashboardFilter {
            period: Period::Today,
            ..DashboardFilter::default()
        };
        let set = filtered(&tickets, &today, now());
        assert!(set.iter().all(|t| t.created_at.date() == now().date()));
        assert!(!set.is_empty());

        let week = DashboardFilter {
            period: Period::Week,
            ..DashboardFilter::default()
        };
        assert_eq!(filtered(&tickets, &week, now()).len(), 47);

        let later = stamp::parse("2026-02-01 00:00").unwrap();
        let month = DashboardFilter {
            period: Period::Month,
            ..DashboardFilter::default()
        };
        assert!(filtered(&tickets, &month, later).is_empty());
    }
}
