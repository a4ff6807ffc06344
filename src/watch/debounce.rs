// src/watch/debounce.rs

use std::time::{Duration, Instant};

/// Leading-edge settle-window debouncer.
///
/// The first event fires; later events inside the window are swallowed.
/// Each binding owns one, so bursts on one pattern never suppress triggers
/// for another.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether an event at `now` should fire. Firing arms the window.
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
