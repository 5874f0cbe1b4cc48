use std::fmt::Display;

use chrono::{Datelike, NaiveDate, Weekday};
use clap::ValueEnum;

use super::{date_key::DateKey, session_store::SessionStore};

/// Calendar period a total is computed over. Weeks start on Monday.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
            Period::Year => write!(f, "year"),
        }
    }
}

impl Period {
    /// Inclusive first and last day of the period containing `reference`.
    pub fn bounds(&self, reference: DateKey) -> (DateKey, DateKey) {
        let date = reference.date();
        match self {
            Period::Day => (reference, reference),
            Period::Week => {
                let week = date.week(Weekday::Mon);
                (week.first_day().into(), week.last_day().into())
            }
            Period::Month => {
                let first = first_of_month(date.year(), date.month());
                let next = if date.month() == 12 {
                    first_of_month(date.year() + 1, 1)
                } else {
                    first_of_month(date.year(), date.month() + 1)
                };
                (first, next.sub_days(1))
            }
            Period::Year => (first_of_month(date.year(), 1), last_of_year(date.year())),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> DateKey {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(DateKey::from)
        .unwrap_or_else(|| NaiveDate::MAX.into())
}

fn last_of_year(year: i32) -> DateKey {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .map(DateKey::from)
        .unwrap_or_else(|| NaiveDate::MAX.into())
}

/// Total hours logged in the period containing `reference`. Zero when nothing was logged.
pub fn total_for_period(store: &SessionStore, period: Period, reference: DateKey) -> f64 {
    let (start, end) = period.bounds(reference);
    store.sum_range(start, end)
}

#[cfg(test)]
mod tests {
    use crate::tracking::{date_key::DateKey, entities::Session, session_store::SessionStore};

    use super::{Period, total_for_period};

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_week_bounds_start_on_monday() {
        // 2024-03-15 is a Friday
        assert_eq!(
            Period::Week.bounds(key("2024-03-15")),
            (key("2024-03-11"), key("2024-03-17"))
        );
        // Monday and Sunday map onto their own week
        assert_eq!(
            Period::Week.bounds(key("2024-03-11")),
            (key("2024-03-11"), key("2024-03-17"))
        );
        assert_eq!(
            Period::Week.bounds(key("2024-03-17")),
            (key("2024-03-11"), key("2024-03-17"))
        );
        // crosses a year boundary
        assert_eq!(
            Period::Week.bounds(key("2025-01-01")),
            (key("2024-12-30"), key("2025-01-05"))
        );
    }

    #[test]
    fn test_month_and_year_bounds() {
        assert_eq!(
            Period::Month.bounds(key("2024-02-10")),
            (key("2024-02-01"), key("2024-02-29"))
        );
        assert_eq!(
            Period::Month.bounds(key("2023-02-10")),
            (key("2023-02-01"), key("2023-02-28"))
        );
        assert_eq!(
            Period::Month.bounds(key("2024-12-31")),
            (key("2024-12-01"), key("2024-12-31"))
        );
        assert_eq!(
            Period::Year.bounds(key("2024-06-01")),
            (key("2024-01-01"), key("2024-12-31"))
        );
        assert_eq!(
            Period::Day.bounds(key("2024-06-01")),
            (key("2024-06-01"), key("2024-06-01"))
        );
    }

    #[test]
    fn test_empty_store_totals() {
        let store = SessionStore::new();
        for period in [Period::Day, Period::Week, Period::Month, Period::Year] {
            assert_eq!(total_for_period(&store, period, key("2024-03-15")), 0.);
        }
    }

    #[test]
    fn test_totals() {
        let mut store = SessionStore::new();
        store.add_session(key("2024-01-01"), Session::new(3., None).unwrap());
        store.add_session(key("2024-12-31"), Session::new(2., None).unwrap());
        store.add_session(key("2024-06-03"), Session::new(0.5, None).unwrap());
        store.add_session(key("2024-06-09"), Session::new(0.25, None).unwrap());
        store.add_session(key("2024-06-10"), Session::new(1., None).unwrap());

        assert_eq!(total_for_period(&store, Period::Year, key("2024-06-01")), 6.75);
        assert_eq!(total_for_period(&store, Period::Month, key("2024-06-01")), 1.75);
        assert_eq!(total_for_period(&store, Period::Week, key("2024-06-05")), 0.75);
        assert_eq!(total_for_period(&store, Period::Day, key("2024-06-10")), 1.);
        assert_eq!(total_for_period(&store, Period::Year, key("2025-01-01")), 0.);
    }

    #[test]
    fn test_year_total_from_both_ends() {
        let mut store = SessionStore::new();
        store.add_session(key("2024-01-01"), Session::new(3., None).unwrap());
        store.add_session(key("2024-12-31"), Session::new(2., None).unwrap());
        assert_eq!(total_for_period(&store, Period::Year, key("2024-06-01")), 5.0);
    }
}
