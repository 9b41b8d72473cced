use std::time::{Duration, Instant};

use tracing::debug;

/// Trailing debounce for offset recomputation.
///
/// Every notification pushes the deadline out by the debounce window; a run
/// becomes due once notifications have been quiet that long. Pending work is
/// tagged with the session generation it was raised for and dropped if the
/// session changed in the meantime.
#[derive(Debug, Clone)]
pub struct RecalcScheduler {
    debounce: Duration,
    pending: Option<PendingRecalc>,
}

#[derive(Debug, Clone, Copy)]
struct PendingRecalc {
    deadline: Instant,
    generation: u64,
    notifications: usize,
}

impl RecalcScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
        }
    }

    pub fn notify(&mut self, now: Instant, generation: u64) {
        let deadline = now + self.debounce;
        match &mut self.pending {
            Some(pending) if pending.generation == generation => {
                pending.deadline = deadline;
                pending.notifications += 1;
            }
            slot => {
                *slot = Some(PendingRecalc {
                    deadline,
                    generation,
                    notifications: 1,
                });
            }
        }
    }

    /// Take the pending run if its deadline passed. Returns how many
    /// notifications it coalesced.
    pub fn take_due(&mut self, now: Instant, generation: u64) -> Option<usize> {
        let pending = self.pending?;
        if pending.deadline > now {
            return None;
        }
        self.pending = None;
        if pending.generation != generation {
            debug!(
                stale = pending.generation,
                current = generation,
                "dropping recalculation for a previous session"
            );
            return None;
        }
        Some(pending.notifications)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Decides whether a recalculation is significant enough to repaint the minimap.
#[derive(Debug, Clone)]
pub struct RepaintGate {
    threshold_pct: u32,
    item_threshold: usize,
    painted_total: Option<u32>,
    measured_since_paint: usize,
    deferred: bool,
}

impl RepaintGate {
    pub fn new(threshold_pct: u32, item_threshold: usize) -> Self {
        Self {
            threshold_pct,
            item_threshold,
            painted_total: None,
            measured_since_paint: 0,
            deferred: false,
        }
    }

    pub fn record_measured(&mut self, count: usize) {
        self.measured_since_paint += count;
    }

    pub fn should_repaint(&self, total_height: u32) -> bool {
        let Some(painted) = self.painted_total else {
            return true;
        };
        if self.measured_since_paint > self.item_threshold {
            return true;
        }
        let delta = u64::from(total_height.abs_diff(painted));
        delta * 100 > u64::from(painted.max(1)) * u64::from(self.threshold_pct)
    }

    pub fn mark_painted(&mut self, total_height: u32) {
        self.painted_total = Some(total_height);
        self.measured_since_paint = 0;
        self.deferred = false;
    }

    /// Remember a repaint decision while an interaction is settling.
    pub fn defer(&mut self) {
        self.deferred = true;
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    pub fn take_deferred(&mut self) -> bool {
        std::mem::take(&mut self.deferred)
    }

    /// Forget everything painted for the previous sequence.
    pub fn reset(&mut self) {
        self.painted_total = None;
        self.measured_since_paint = 0;
        self.deferred = false;
    }
}
