use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    storage::snapshot_storage::SnapshotStorage,
    tracking::{
        date_key::DateKey,
        entities::{Session, TimeUnit, parse_duration},
        tracker::Tracker,
    },
    utils::format::format_hours,
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Day selection shared by commands that work with a single day.
#[derive(Debug, Clone, clap::Args)]
pub struct DayArg {
    #[arg(
        long = "date",
        short,
        help = "Day of the session. Examples are \"yesterday\", \"2 days ago\", \"15/03/2025\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

impl DayArg {
    /// Resolves the day, falling back to `today`.
    pub fn resolve(&self, today: DateKey) -> Result<DateKey> {
        match &self.date {
            Some(date) => parse_day(date, Local::now(), self.date_style),
            None => Ok(today),
        }
    }
}

/// Parses a loose date description into a calendar day relative to `now`.
pub fn parse_day(value: &str, now: DateTime<Local>, date_style: DateStyle) -> Result<DateKey> {
    match parse_date_string(value, now, date_style.into()) {
        Ok(v) => Ok(v.date_naive().into()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {value}: {e}"),
            )
            .into()),
    }
}

#[derive(Debug, Parser)]
pub struct LogCommand {
    #[arg(help = "Time spent studying, in the selected unit")]
    amount: String,
    #[arg(short, long, default_value_t = TimeUnit::Minutes, help = "Unit of the amount")]
    unit: TimeUnit,
    #[arg(short, long, help = "What was studied")]
    note: Option<String>,
    #[command(flatten)]
    day: DayArg,
}

/// Command to process `log` command. Validates the input before anything reaches the store.
pub async fn process_log_command<S: SnapshotStorage>(
    tracker: &mut Tracker<S>,
    LogCommand {
        amount,
        unit,
        note,
        day,
    }: LogCommand,
) -> Result<()> {
    let date = day.resolve(tracker.today())?;
    let session = parse_duration(&amount, unit)
        .and_then(|hours| Session::new(hours, note))
        .map_err(|e| {
            Args::command().error(
                clap::error::ErrorKind::ValueValidation,
                format!("Can't log {amount} {unit}: {e}"),
            )
        })?;

    let hours = session.duration_hours;
    tracker.log_session(date, session).await?;
    println!("Logged {} on {date}", format_hours(hours));
    Ok(())
}
