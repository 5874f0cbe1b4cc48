use ansi_term::Colour;
use anyhow::Result;
use chrono::{Datelike, Weekday};
use clap::Parser;

use crate::{
    storage::snapshot_storage::SnapshotStorage,
    tracking::{
        heat_map::{Bucket, GRID_COLUMNS, GRID_ROWS, Grid},
        period::Period,
        tracker::Tracker,
    },
    utils::format::format_hours,
};

use super::log::DayArg;

/// Light palette of the heat map, one colour per bucket.
const PALETTE: [(u8, u8, u8); 5] = [
    (0xeb, 0xed, 0xf0),
    (0x9b, 0xe9, 0xa8),
    (0x40, 0xc4, 0x63),
    (0x30, 0xa1, 0x4e),
    (0x21, 0x6e, 0x39),
];

const CELL: &str = "■";
const CELL_WIDTH: usize = 2;
const LABEL_WIDTH: usize = 4;

#[derive(Debug, Parser)]
pub struct SessionsCommand {
    #[command(flatten)]
    day: DayArg,
}

pub fn process_sessions_command<S: SnapshotStorage>(
    tracker: &Tracker<S>,
    SessionsCommand { day }: SessionsCommand,
) -> Result<()> {
    let date = day.resolve(tracker.today())?;
    let sessions = tracker.sessions_for(date);
    if sessions.is_empty() {
        println!("No study sessions logged for {date}.");
        return Ok(());
    }

    println!("Study sessions on {}", date.date().format("%b %-d, %Y"));
    for (index, session) in sessions.iter().enumerate() {
        match &session.note {
            Some(note) => println!(
                "Session {}\t{}\t{note}",
                index + 1,
                format_hours(session.duration_hours)
            ),
            None => println!(
                "Session {}\t{}",
                index + 1,
                format_hours(session.duration_hours)
            ),
        }
    }
    Ok(())
}

pub fn print_totals<S: SnapshotStorage>(tracker: &Tracker<S>, period: Option<Period>) {
    let periods = match period {
        Some(period) => vec![period],
        None => vec![Period::Day, Period::Week, Period::Month, Period::Year],
    };
    for period in periods {
        println!("This {period}\t{}", format_hours(tracker.total(period)));
    }
}

fn paint(bucket: Bucket) -> String {
    let (r, g, b) = PALETTE[bucket.level() as usize];
    Colour::RGB(r, g, b).paint(CELL).to_string()
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Wed => "Wed",
        Weekday::Fri => "Fri",
        _ => "",
    }
}

/// Month names placed above the first column that contains the 1st of a month.
fn month_header(grid: &Grid) -> String {
    let mut header = " ".repeat(LABEL_WIDTH + GRID_COLUMNS * CELL_WIDTH);
    let mut free_from = 0;
    for (column, days) in grid.columns().enumerate() {
        let Some(first) = days.iter().find(|v| v.date.day() == 1) else {
            continue;
        };
        let position = LABEL_WIDTH + column * CELL_WIDTH;
        if position < free_from {
            continue;
        }
        let name = first.date.date().format("%b").to_string();
        let end = (position + name.len()).min(header.len());
        header.replace_range(position..end, &name[..end - position]);
        free_from = end + 1;
    }
    header.trim_end().to_string()
}

/// Renders rows of the grid. Every row holds the same weekday because columns are 7 consecutive
/// days.
pub fn render_heat_map(grid: &Grid) -> Vec<String> {
    let mut lines = vec![month_header(grid)];
    for row in 0..GRID_ROWS {
        let weekday = grid.cell_at(0, row).map(|v| v.date.date().weekday());
        let mut line = format!(
            "{:<width$}",
            weekday.map(weekday_label).unwrap_or_default(),
            width = LABEL_WIDTH
        );
        for column in 0..GRID_COLUMNS {
            if let Some(cell) = grid.cell_at(column, row) {
                line.push_str(&paint(cell.bucket));
                line.push(' ');
            }
        }
        lines.push(line.trim_end().to_string());
    }

    let legend = PALETTE
        .iter()
        .map(|(r, g, b)| Colour::RGB(*r, *g, *b).paint(CELL).to_string())
        .collect::<Vec<_>>()
        .join(" ");
    lines.push(format!("{:width$}Less {legend} More", "", width = LABEL_WIDTH));
    lines
}

pub fn print_heat_map(grid: &Grid) {
    for line in render_heat_map(grid) {
        println!("{line}");
    }
    if let (Some(first), Some(last)) = (grid.first_day(), grid.last_day()) {
        println!(
            "{} from {first} to {last}",
            format_hours(grid.total_hours())
        );
    }
}
