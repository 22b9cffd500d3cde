//! Time provider abstraction for testable time-dependent code.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of the current time.
///
/// Everything that stamps `created_at` or compares against `expires_at`
/// reads the clock through this trait so tests can pin time.
pub trait TimeProvider: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Production implementation that uses the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl SystemTimeProvider {
    pub const fn new() -> Self {
        Self
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable clock for tests.
#[derive(Debug, Clone)]
pub struct MockTime {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl MockTime {
    /// Create a mock clock starting at `initial`.
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(initial)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.current.lock() = to;
    }
}

impl TimeProvider for MockTime {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
