use std::time::Duration;

/// Fixed-interval gate between rendered frames and discrete ticks
///
/// At most one tick fires per frame; time that elapses beyond one interval
/// is dropped rather than replayed.
#[derive(Debug, Clone)]
pub struct StepScheduler {
    interval: Duration,
    last_tick: Duration,
}

impl StepScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Restart the interval from `now`
    pub fn reset(&mut self, now: Duration) {
        self.last_tick = now;
    }

    /// Called once per frame with the host's frame timestamp; returns whether a tick is due
    pub fn poll(&mut self, now: Duration) -> bool {
        let delta = now.saturating_sub(self.last_tick);
        if delta > self.interval {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}
