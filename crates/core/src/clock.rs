//! Injectable source of "now".
//!
//! The title year bound depends on the calendar year at request time. Handlers
//! read it through a [`Clock`] so tests can pin it with [`FixedClock`].

use chrono::Datelike;

/// Provides the current calendar year.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Wall-clock implementation backed by `chrono::Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        chrono::Utc::now().year()
    }
}

/// A clock frozen at a given year.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}
