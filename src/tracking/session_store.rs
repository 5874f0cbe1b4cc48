use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use super::{date_key::DateKey, entities::Session};

/// Serializable state of a [SessionStore]. Serializes into the persisted format: an object that
/// maps `YYYY-MM-DD` to an array of sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<DateKey, Vec<Session>>);

impl Snapshot {
    /// Parses and validates snapshot text.
    pub fn parse(raw: &str) -> Result<Self, MalformedSnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        for (date, sessions) in &snapshot.0 {
            if let Some(session) = sessions.iter().find(|v| !v.is_valid_duration()) {
                return Err(MalformedSnapshotError::InvalidDuration {
                    date: *date,
                    value: session.duration_hours,
                });
            }
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Error)]
pub enum MalformedSnapshotError {
    #[error("snapshot is not valid: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("session on {date} has invalid duration {value}")]
    InvalidDuration { date: DateKey, value: f64 },
}

/// In-memory sessions keyed by day. Sessions of a day keep insertion order and a day is only
/// present while it has at least one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    days: BTreeMap<DateKey, Vec<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut days = snapshot.0;
        days.retain(|_, sessions| !sessions.is_empty());
        Self { days }
    }

    /// Appends a session to `date`. Callers validate the duration beforehand, see
    /// [Session::new].
    pub fn add_session(&mut self, date: DateKey, session: Session) {
        debug_assert!(
            session.is_valid_duration(),
            "session duration must be finite and positive"
        );
        self.days.entry(date).or_default().push(session);
    }

    /// Sum of all session durations in `[start, end]`. An inverted range is empty and sums to 0.
    pub fn sum_range(&self, start: DateKey, end: DateKey) -> f64 {
        if start > end {
            return 0.;
        }
        self.days
            .range(start..=end)
            .flat_map(|(_, sessions)| sessions)
            .map(|session| session.duration_hours)
            .sum()
    }

    /// Totals of every day that has sessions within `[start, end]`, in ascending order.
    pub fn day_totals(&self, start: DateKey, end: DateKey) -> impl Iterator<Item = (DateKey, f64)> + '_ {
        let range = (start <= end).then(|| self.days.range(start..=end));
        range.into_iter().flatten().map(|(date, sessions)| {
            (
                *date,
                sessions.iter().map(|session| session.duration_hours).sum(),
            )
        })
    }

    pub fn sessions_for(&self, date: DateKey) -> &[Session] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of days with at least one session.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.days.clone())
    }

    /// Replaces the whole store with the contents of `raw`. On failure the store is untouched.
    #[instrument(skip(self, raw))]
    pub fn load(&mut self, raw: &str) -> Result<(), MalformedSnapshotError> {
        let snapshot = Snapshot::parse(raw)?;
        *self = Self::from_snapshot(snapshot);
        debug!("Loaded sessions for {} days", self.days.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::tracking::{date_key::DateKey, entities::Session};

    use super::{MalformedSnapshotError, SessionStore};

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn session(hours: f64) -> Session {
        Session::new(hours, None).unwrap()
    }

    fn sample_store() -> SessionStore {
        let mut store = SessionStore::new();
        store.add_session(key("2024-01-01"), session(3.));
        store.add_session(key("2024-02-29"), session(0.25));
        store.add_session(key("2024-03-10"), session(1.5));
        store.add_session(key("2024-03-10"), session(0.5));
        store.add_session(key("2024-12-31"), session(2.));
        store
    }

    #[test]
    fn test_add_session_same_day() {
        let mut store = SessionStore::new();
        store.add_session(key("2024-03-10"), session(1.5));
        store.add_session(
            key("2024-03-10"),
            Session::new(0.5, Some("review".into())).unwrap(),
        );

        assert_eq!(store.sum_range(key("2024-03-10"), key("2024-03-10")), 2.0);
        let sessions = store.sessions_for(key("2024-03-10"));
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].duration_hours, 1.5);
        assert_eq!(sessions[1].note.as_deref(), Some("review"));
        assert!(store.sessions_for(key("2024-03-11")).is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sum_range_bounds() {
        let store = sample_store();
        assert_eq!(store.sum_range(key("2024-01-01"), key("2024-12-31")), 7.25);
        assert_eq!(store.sum_range(key("2024-01-02"), key("2024-12-30")), 2.25);
        assert_eq!(store.sum_range(key("2025-01-01"), key("2025-12-31")), 0.);
        assert_eq!(store.sum_range(key("2024-12-31"), key("2024-01-01")), 0.);
    }

    #[test]
    fn test_sum_range_additivity() {
        let store = sample_store();
        let start = key("2023-12-01");
        let end = key("2025-01-15");
        let whole = store.sum_range(start, end);
        let mut mid = start;
        while mid < end {
            let split = store.sum_range(start, mid) + store.sum_range(mid.succ(), end);
            assert!((whole - split).abs() < 1e-9, "split at {mid}");
            mid = mid.add_days(7);
        }
    }

    #[test]
    fn test_day_totals() {
        let store = sample_store();
        let totals = store
            .day_totals(key("2024-02-01"), key("2024-03-31"))
            .collect::<Vec<_>>();
        assert_eq!(totals, vec![(key("2024-02-29"), 0.25), (key("2024-03-10"), 2.0)]);
        assert_eq!(store.day_totals(key("2024-03-31"), key("2024-02-01")).count(), 0);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut store = sample_store();
        store.add_session(
            key("2024-03-10"),
            Session::new(1.0, Some("notes".into())).unwrap(),
        );
        let json = store.snapshot().to_json().unwrap();

        let mut restored = SessionStore::new();
        restored.load(&json).unwrap();
        assert_eq!(restored, store);
        assert_eq!(restored.sessions_for(key("2024-03-10")), store.sessions_for(key("2024-03-10")));
    }

    #[test]
    fn test_snapshot_format() {
        let mut store = SessionStore::new();
        store.add_session(key("2024-03-10"), Session::new(1.5, Some("a".into())).unwrap());
        store.add_session(key("2024-03-09"), session(0.5));
        assert_eq!(
            store.snapshot().to_json().unwrap(),
            r#"{"2024-03-09":[{"time":0.5}],"2024-03-10":[{"time":1.5,"description":"a"}]}"#
        );
    }

    #[test]
    fn test_load_replaces_state() {
        let mut store = sample_store();
        store
            .load(r#"{"2020-05-05":[{"time":1,"description":""}],"2020-05-06":[]}"#)
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.sum_range(key("2024-01-01"), key("2024-12-31")), 0.);
        assert_eq!(store.sum_range(key("2020-05-05"), key("2020-05-05")), 1.);
        assert!(store.sessions_for(key("2020-05-06")).is_empty());
    }

    #[test]
    fn test_load_malformed_keeps_state() {
        let mut store = sample_store();
        let before = store.clone();

        for raw in [
            r#"{"2024-03-10": "not-an-array"}"#,
            r#"{"2024-03-10": [{"time": "two"}]}"#,
            r#"{"2024-03-10": [{"description": "missing time"}]}"#,
            r#"{"10/03/2024": [{"time": 1}]}"#,
            r#"[1, 2, 3]"#,
            "not json",
        ] {
            let result = store.load(raw);
            assert!(
                matches!(result, Err(MalformedSnapshotError::Shape(_))),
                "{raw} {result:?}"
            );
            assert_eq!(store, before);
        }

        let result = store.load(r#"{"2024-03-10": [{"time": -1}]}"#);
        assert!(matches!(
            result,
            Err(MalformedSnapshotError::InvalidDuration { value, .. }) if value == -1.
        ));
        assert_eq!(store, before);
    }
}
