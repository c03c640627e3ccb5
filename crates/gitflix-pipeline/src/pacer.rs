use std::thread;
use std::time::{Duration, Instant};

/// Presentation-rate governor.
///
/// Tracks a monotonic deadline one frame interval ahead. After each present
/// the caller invokes [`FramePacer::pace`]: if the deadline is in the
/// future the pacer sleeps the difference and advances the deadline by one
/// interval; if decoding lagged past it, the deadline resets from now — no
/// catch-up bursts.
pub struct FramePacer {
    interval: Duration,
    next_deadline: Instant,
}

impl FramePacer {
    /// Pace at `target_fps` frames per second, starting now.
    pub fn new(target_fps: u32) -> Self {
        let interval = Duration::from_secs(1) / target_fps.max(1);
        Self {
            interval,
            next_deadline: Instant::now() + interval,
        }
    }

    /// The frame interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep out the rest of the current frame slot.
    pub fn pace(&mut self) {
        let now = Instant::now();
        if now < self.next_deadline {
            thread::sleep(self.next_deadline - now);
            self.next_deadline += self.interval;
        } else {
            self.next_deadline = now + self.interval;
        }
    }
}
