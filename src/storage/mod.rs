//!  Persistence of sessions is organized through [snapshot_storage::SnapshotStorage].
//!  The basic idea is:
//!   - The whole session store is saved as one JSON snapshot after every change.
//!   - The snapshot is loaded once when the application starts.
//!   - Storage never interprets the snapshot, parsing belongs to
//!     [SessionStore](crate::tracking::session_store::SessionStore).

pub mod snapshot_storage;
