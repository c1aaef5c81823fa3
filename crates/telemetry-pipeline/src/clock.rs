//! Wall clock abstraction

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of Unix time in whole seconds
pub trait Clock {
    /// Seconds since the Unix epoch
    fn now(&self) -> u64;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // Clamp pre-epoch clocks to zero
        u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Clock frozen at `now`
    pub fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::Relaxed);
    }

    /// Jump to an absolute time
    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}
