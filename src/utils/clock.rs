use chrono::Local;

use crate::tracking::date_key::DateKey;

/// Represents an entity responsible for providing "today" across application. This can allow it
/// to be used for testing
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync + 'static {
    fn today(&self) -> DateKey;
}

/// Uses the local calendar day of the machine.
pub struct DefaultClock;

impl Clock for DefaultClock {
    fn today(&self) -> DateKey {
        Local::now().date_naive().into()
    }
}
