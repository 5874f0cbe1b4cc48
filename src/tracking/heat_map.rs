//! Heat map of daily totals over the trailing year.
//!
//! The grid is week aligned: 53 columns of 7 days, 371 cells in total, ending on `today`. The
//! first six cells are the tail of the week before the trailing 365 day window, so the number of
//! cells never depends on leap years.

use std::{collections::HashMap, fmt::Display};

use tracing::{instrument, trace};

use crate::utils::format::format_tooltip;

use super::{date_key::DateKey, session_store::SessionStore};

pub const GRID_COLUMNS: usize = 53;
pub const GRID_ROWS: usize = 7;
pub const GRID_DAYS: usize = GRID_COLUMNS * GRID_ROWS;

/// Intensity level of a day, from 0 (nothing logged) to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bucket(u8);

impl Bucket {
    pub const MAX: Bucket = Bucket(4);

    /// Classifies a day's total. Upper bounds are inclusive, so exactly 1 hour is still bucket 1.
    pub fn from_hours(total_hours: f64) -> Self {
        let level = if total_hours <= 0. {
            0
        } else if total_hours <= 1. {
            1
        } else if total_hours <= 2. {
            2
        } else if total_hours <= 4. {
            3
        } else {
            4
        };
        Bucket(level)
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatMapCell {
    pub date: DateKey,
    pub total_hours: f64,
    pub bucket: Bucket,
}

impl HeatMapCell {
    fn new(date: DateKey, total_hours: f64) -> Self {
        Self {
            date,
            total_hours,
            bucket: Bucket::from_hours(total_hours),
        }
    }

    pub fn tooltip(&self) -> String {
        format_tooltip(self.date, self.total_hours)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Vec<HeatMapCell>,
}

impl Grid {
    /// Cells from oldest to newest.
    pub fn cells(&self) -> &[HeatMapCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn first_day(&self) -> Option<DateKey> {
        self.cells.first().map(|v| v.date)
    }

    pub fn last_day(&self) -> Option<DateKey> {
        self.cells.last().map(|v| v.date)
    }

    /// Cell at a column (week) and row (position inside the week).
    pub fn cell_at(&self, column: usize, row: usize) -> Option<&HeatMapCell> {
        if row >= GRID_ROWS {
            return None;
        }
        self.cells.get(column * GRID_ROWS + row)
    }

    /// Cells grouped by column, each column holding 7 consecutive days.
    pub fn columns(&self) -> impl Iterator<Item = &[HeatMapCell]> {
        self.cells.chunks(GRID_ROWS)
    }

    pub fn total_hours(&self) -> f64 {
        self.cells.iter().map(|v| v.total_hours).sum()
    }
}

/// First day shown by a grid ending at `today`.
pub fn grid_start(today: DateKey) -> DateKey {
    today.sub_days(GRID_DAYS as u64 - 1)
}

/// Builds the grid ending at `today`. Totals are collected with a single pass over the days that
/// have sessions, each equal to `store.sum_range(day, day)`.
#[instrument(skip(store))]
pub fn build_grid(store: &SessionStore, today: DateKey) -> Grid {
    let start = grid_start(today);

    let totals = store.day_totals(start, today).collect::<HashMap<_, _>>();
    trace!("{} days with sessions in grid", totals.len());

    let cells = (0..GRID_DAYS as u64)
        .map(|offset| {
            let date = start.add_days(offset);
            HeatMapCell::new(date, totals.get(&date).copied().unwrap_or(0.))
        })
        .collect::<Vec<_>>();

    Grid { cells }
}
