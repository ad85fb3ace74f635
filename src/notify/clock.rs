use std::sync::Mutex;
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used by scripted sessions and tests.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move forward by `by`. Returns `false`, leaving the clock where it was,
    /// when the result would not fit in an `Instant`.
    pub fn advance(&self, by: Duration) -> bool {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        let next = offset
            .checked_add(by)
            .filter(|next| self.base.checked_add(*next).is_some());
        match next {
            Some(next) => {
                *offset = next;
                true
            }
            None => false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        // advance never stores an offset that overflows base
        self.base.checked_add(self.elapsed()).unwrap_or(self.base)
    }
}
