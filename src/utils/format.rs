use crate::tracking::date_key::DateKey;

/// Human readable duration. Anything under an hour is shown in whole minutes.
pub fn format_hours(hours: f64) -> String {
    if hours < 1. {
        format!("{} minutes", (hours * 60.).round() as i64)
    } else {
        format!("{hours:.2} hours")
    }
}

/// Hover text of a heat map cell.
pub fn format_tooltip(date: DateKey, hours: f64) -> String {
    format!("{date}: {hours:.2} hours")
}
