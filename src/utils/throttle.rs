use crate::utils::time::{Duration, Instant};

/// Fixed-interval rate limiter.
///
/// The first call in a quiet period passes immediately. Calls arriving less
/// than `interval` after the last one that passed are rejected and are not
/// queued: whatever they carried is dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl Throttle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` and records `now` if the window has elapsed.
    pub fn try_fire_at(&mut self, now: Instant) -> bool {
        let open = self
            .last_fired
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);

        if open {
            self.last_fired = Some(now);
        }
        open
    }

    pub fn try_fire(&mut self) -> bool {
        self.try_fire_at(Instant::now())
    }

    /// Forgets the last emission so the next call passes.
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
