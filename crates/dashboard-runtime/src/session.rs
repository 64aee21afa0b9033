//! Interactive session: widget state plus the snapshot computed from it.
//!
//! Every [`Interaction`] updates [`DashboardState`] and recomputes the whole
//! [`DashboardSnapshot`] synchronously. Nothing is computed incrementally.

use std::ops::RangeInclusive;
use std::sync::Arc;

use dashboard_core::error::Result;
use dashboard_core::models::IncidentTable;
use dashboard_core::settings::Settings;
use dashboard_data::snapshot::{build_snapshot, DashboardSnapshot, ViewParams};
use dashboard_data::views::{self, DEFAULT_COMPARE_HOURS, YEAR_RANGE};

use crate::renderer::Renderer;

/// Hour slider bounds when the table has no rows.
const FULL_DAY: (u32, u32) = (0, 23);

// ── State ─────────────────────────────────────────────────────────────────────

/// Current widget values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardState {
    pub year: i32,
    pub hour: u32,
    pub compare_hours: (u32, u32),
    pub show_date_table: bool,
}

impl DashboardState {
    /// Initial state from the command line, filling gaps from the data.
    pub fn initial(settings: &Settings, table: &IncidentTable) -> Self {
        let (min_hour, max_hour) = views::hour_bounds(table).unwrap_or(FULL_DAY);
        let hour = settings.hour.unwrap_or(min_hour).clamp(min_hour, max_hour);
        let compare_hours = match settings.compare_hours {
            Some(pair) => pair,
            None if settings.auto_compare_hours => {
                views::busiest_and_quietest_hours(table).unwrap_or(DEFAULT_COMPARE_HOURS)
            }
            None => DEFAULT_COMPARE_HOURS,
        };
        Self {
            year: clamp_year(settings.year),
            hour,
            compare_hours,
            show_date_table: settings.show_date_table,
        }
    }

    pub fn params(&self) -> ViewParams {
        ViewParams {
            year: self.year,
            hour: self.hour,
            compare_hours: self.compare_hours,
            show_date_table: self.show_date_table,
        }
    }
}

/// A single user action on the dashboard widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    NextYear,
    PrevYear,
    SetYear(i32),
    NextHour,
    PrevHour,
    SetHour(u32),
    ToggleDateTable,
}

fn clamp_year(year: i32) -> i32 {
    year.clamp(*YEAR_RANGE.start(), *YEAR_RANGE.end())
}

// ── DashboardSession ──────────────────────────────────────────────────────────

/// Owns the shared table, the widget state and the latest snapshot.
pub struct DashboardSession {
    table: Arc<IncidentTable>,
    state: DashboardState,
    hour_range: RangeInclusive<u32>,
    snapshot: DashboardSnapshot,
}

impl DashboardSession {
    pub fn new(table: Arc<IncidentTable>, state: DashboardState) -> Self {
        let (min_hour, max_hour) = views::hour_bounds(&table).unwrap_or(FULL_DAY);
        let state = DashboardState {
            year: clamp_year(state.year),
            hour: state.hour.clamp(min_hour, max_hour),
            ..state
        };
        let snapshot = build_snapshot(&table, state.params());
        tracing::info!(
            incidents = table.len(),
            year = state.year,
            hour = state.hour,
            "dashboard session started"
        );
        Self {
            table,
            state,
            hour_range: min_hour..=max_hour,
            snapshot,
        }
    }

    /// Build a session straight from command-line settings.
    pub fn from_settings(table: Arc<IncidentTable>, settings: &Settings) -> Self {
        let state = DashboardState::initial(settings, &table);
        Self::new(table, state)
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn table(&self) -> &IncidentTable {
        &self.table
    }

    /// Bounds of the hour slider.
    pub fn hour_range(&self) -> RangeInclusive<u32> {
        self.hour_range.clone()
    }

    /// Apply `interaction` and recompute the snapshot.
    pub fn apply(&mut self, interaction: Interaction) -> &DashboardSnapshot {
        let (min_hour, max_hour) = (*self.hour_range.start(), *self.hour_range.end());
        let state = &mut self.state;
        match interaction {
            Interaction::NextYear => state.year = clamp_year(state.year + 1),
            Interaction::PrevYear => state.year = clamp_year(state.year - 1),
            Interaction::SetYear(year) => state.year = clamp_year(year),
            Interaction::NextHour => state.hour = (state.hour + 1).min(max_hour),
            Interaction::PrevHour => state.hour = state.hour.saturating_sub(1).max(min_hour),
            Interaction::SetHour(hour) => state.hour = hour.clamp(min_hour, max_hour),
            Interaction::ToggleDateTable => state.show_date_table = !state.show_date_table,
        }
        tracing::debug!(?interaction, state = ?self.state, "interaction applied");
        self.snapshot = build_snapshot(&self.table, self.state.params());
        &self.snapshot
    }

    /// Hand the current snapshot to `renderer`.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<()> {
        renderer.render(&self.snapshot)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
