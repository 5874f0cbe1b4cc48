use anyhow::Result;
use tracing::{info, instrument, warn};

use crate::{storage::snapshot_storage::SnapshotStorage, utils::clock::Clock};

use super::{
    date_key::DateKey,
    entities::Session,
    heat_map::{Grid, build_grid},
    period::{Period, total_for_period},
    session_store::SessionStore,
};

/// Bridges [SessionStore] and [SnapshotStorage]. The store is loaded once on [Tracker::open] and
/// saved after every change.
pub struct Tracker<S: SnapshotStorage> {
    store: SessionStore,
    storage: S,
    clock: Box<dyn Clock>,
}

impl<S: SnapshotStorage> Tracker<S> {
    /// Loads the stored snapshot. A malformed snapshot is reported and replaced by an empty store,
    /// storage failures are returned.
    #[instrument(skip_all)]
    pub async fn open(storage: S, clock: Box<dyn Clock>) -> Result<Self> {
        let mut store = SessionStore::new();
        match storage.load().await? {
            Some(raw) => {
                if let Err(e) = store.load(&raw) {
                    warn!("Stored sessions are malformed, starting with an empty store: {e}");
                }
            }
            None => info!("No stored sessions, starting with an empty store"),
        }

        Ok(Self {
            store,
            storage,
            clock,
        })
    }

    /// Records a session and saves the new state.
    #[instrument(skip(self))]
    pub async fn log_session(&mut self, date: DateKey, session: Session) -> Result<()> {
        self.store.add_session(date, session);
        let snapshot = self.store.snapshot().to_json()?;
        self.storage.save(snapshot).await?;
        info!("Logged session on {date}");
        Ok(())
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn today(&self) -> DateKey {
        self.clock.today()
    }

    pub fn sessions_for(&self, date: DateKey) -> &[Session] {
        self.store.sessions_for(date)
    }

    /// Total of the period containing today.
    pub fn total(&self, period: Period) -> f64 {
        total_for_period(&self.store, period, self.today())
    }

    /// Heat map ending today.
    pub fn grid(&self) -> Grid {
        build_grid(&self.store, self.today())
    }
}
