// Repeating tick registrations for the single-threaded host loop.
// The overlay never keeps a callback that points back at itself: it keeps the
// `TickHandle` it got from `register` and gives it back on teardown.

use std::time::{Duration, Instant};

use tracing::debug;

/// Identifies a registration when its tick comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickId(u64);

/// Proof of a live registration. Not `Clone`, so it can only be cancelled once.
#[derive(Debug, PartialEq, Eq)]
pub struct TickHandle {
    id: TickId,
}

impl TickHandle {
    pub fn id(&self) -> TickId {
        self.id
    }
}

struct Registration {
    id: TickId,
    interval: Duration,
    next_due: Instant,
}

#[derive(Default)]
pub struct FrameTicker {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl FrameTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, interval: Duration, now: Instant) -> TickHandle {
        let id = TickId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration { id, interval, next_due: now + interval });
        debug!(?id, interval_ms = interval.as_millis() as u64, "tick registered");
        TickHandle { id }
    }

    pub fn cancel(&mut self, handle: TickHandle) {
        self.registrations.retain(|r| r.id != handle.id);
        debug!(id = ?handle.id, "tick cancelled");
    }

    /// Registrations due at `now`. Each one fires at most once per call and is
    /// rescheduled from `now`, so a stalled loop does not replay missed ticks.
    pub fn due(&mut self, now: Instant) -> Vec<TickId> {
        let mut fired = Vec::new();
        for r in &mut self.registrations {
            if now >= r.next_due {
                fired.push(r.id);
                r.next_due = now + r.interval;
            }
        }
        fired
    }

    pub fn active(&self) -> usize {
        self.registrations.len()
    }
}
