//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};

use taskye_core::{Category, ItemKind, ItemStatus, Lane, Period, Priority, Scope, Status};

use crate::cli::{
    CategoryArg, ItemKindArg, ItemStatusArg, LaneArg, PeriodArg, PriorityArg, ScopeArg, StatusArg,
};
use crate::error::CliError;

// ── Arg → domain conversions ────────────────────────────────────────

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::High => Self::High,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::Low => Self::Low,
        }
    }
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Open => Self::Open,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Waiting => Self::Waiting,
            StatusArg::Resolved => Self::Resolved,
        }
    }
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Hardware => Self::Hardware,
            CategoryArg::Software => Self::Software,
            CategoryArg::Access => Self::Access,
            CategoryArg::Network => Self::Network,
            CategoryArg::Other => Self::Other,
        }
    }
}

impl From<LaneArg> for Lane {
    fn from(arg: LaneArg) -> Self {
        match arg {
            LaneArg::Backlog => Self::Backlog,
            LaneArg::Todo => Self::Todo,
            LaneArg::InProgress => Self::InProgress,
            LaneArg::Review => Self::Review,
            LaneArg::Done => Self::Done,
        }
    }
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::All => Self::All,
            ScopeArg::Open => Self::Open,
            ScopeArg::Resolved => Self::Resolved,
        }
    }
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::All => Self::All,
            PeriodArg::Today => Self::Today,
            PeriodArg::Week => Self::Week,
            PeriodArg::Month => Self::Month,
        }
    }
}

impl From<ItemKindArg> for ItemKind {
    fn from(arg: ItemKindArg) -> Self {
        match arg {
            ItemKindArg::Computer => Self::Computer,
            ItemKindArg::Monitor => Self::Monitor,
            ItemKindArg::Printer => Self::Printer,
            ItemKindArg::Server => Self::Server,
            ItemKindArg::Laptop => Self::Laptop,
            ItemKindArg::Other => Self::Other,
        }
    }
}

impl From<ItemStatusArg> for ItemStatus {
    fn from(arg: ItemStatusArg) -> Self {
        match arg {
            ItemStatusArg::Available => Self::Available,
            ItemStatusArg::InUse => Self::InUse,
            ItemStatusArg::Maintenance => Self::Maintenance,
            ItemStatusArg::Obsolete => Self::Obsolete,
        }
    }
}

// ── Interactive helpers ─────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed. Without a
/// terminal to ask on, the operation is refused.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Spinner on stderr while a provider call runs; hidden with `--quiet`.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ── Parsing ─────────────────────────────────────────────────────────

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_parse_or_explain() {
        assert_eq!(
            parse_date("warranty", "2026-03-01").ok(),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert!(matches!(
            parse_date("warranty", "01/03/2026"),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn lanes_convert() {
        assert_eq!(Lane::from(LaneArg::Review), Lane::Review);
        assert_eq!(Lane::from(LaneArg::Todo).status(), Status::Open);
    }
}
