use std::fmt::Display;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single logged session. Field names follow the persisted snapshot format, where a session is
/// stored as `{"time": <hours>, "description": <note>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "time")]
    pub duration_hours: f64,
    #[serde(
        rename = "description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
}

impl Session {
    /// Creates a validated session. Empty or whitespace-only notes are dropped.
    pub fn new(duration_hours: f64, note: Option<String>) -> Result<Self, ValidationError> {
        validate_hours(duration_hours)?;
        let note = note.filter(|v| !v.trim().is_empty());
        Ok(Self {
            duration_hours,
            note,
        })
    }

    pub(crate) fn is_valid_duration(&self) -> bool {
        validate_hours(self.duration_hours).is_ok()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("duration must be a finite number")]
    NotFinite,
    #[error("duration must be greater than zero, got {0}")]
    NotPositive(f64),
}

fn validate_hours(hours: f64) -> Result<(), ValidationError> {
    if !hours.is_finite() {
        Err(ValidationError::NotFinite)
    } else if hours <= 0. {
        Err(ValidationError::NotPositive(hours))
    } else {
        Ok(())
    }
}

/// Unit the user enters a duration in. Sessions are always stored in hours.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TimeUnit {
    Minutes,
    Hours,
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Minutes => write!(f, "minutes"),
            TimeUnit::Hours => write!(f, "hours"),
        }
    }
}

/// Parses user input into a duration in hours.
pub fn parse_duration(raw: &str, unit: TimeUnit) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    let value = raw
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber(raw.to_string()))?;
    validate_hours(value)?;
    let hours = match unit {
        TimeUnit::Minutes => value / 60.,
        TimeUnit::Hours => value,
    };
    Ok(hours)
}
