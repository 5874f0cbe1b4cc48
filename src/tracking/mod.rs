//! Session aggregation engine. [session_store::SessionStore] keeps sessions per day, while
//! [heat_map] and [period] derive the views shown to the user.

pub mod date_key;
pub mod entities;
pub mod heat_map;
pub mod period;
pub mod session_store;
pub mod tracker;
