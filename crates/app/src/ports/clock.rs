//! Clock port: local wall time, injectable for tests.

use std::sync::Arc;

use lumen_domain::time::{self, LocalTime};

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> LocalTime;
}

/// The host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> LocalTime {
        time::now()
    }
}

impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> LocalTime {
        (**self).now()
    }
}
