pub mod state;

use std::time::{Duration, Instant};

pub use state::FollowTailState;

/// Paces update checks for the open session.
///
/// One check is in flight at a time; the next one is due `interval` after
/// the previous check was sent. A zero interval disables polling.
#[derive(Debug, Clone)]
pub struct UpdatePoller {
    interval: Duration,
    last_sent: Option<Instant>,
    in_flight: bool,
}

impl UpdatePoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: None,
            in_flight: false,
        }
    }

    /// Start counting from `now`, e.g. right after a session was loaded.
    pub fn restart(&mut self, now: Instant) {
        self.last_sent = Some(now);
        self.in_flight = false;
    }

    pub fn is_due(&self, now: Instant) -> bool {
        if self.interval.is_zero() || self.in_flight {
            return false;
        }
        self.last_sent
            .is_none_or(|sent| now.duration_since(sent) >= self.interval)
    }

    pub fn mark_sent(&mut self, now: Instant) {
        self.last_sent = Some(now);
        self.in_flight = true;
    }

    pub fn mark_done(&mut self) {
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poller_waits_for_interval_and_reply() {
        let t0 = Instant::now();
        let mut poller = UpdatePoller::new(Duration::from_secs(5));
        poller.restart(t0);
        assert!(!poller.is_due(t0 + Duration::from_secs(4)));
        assert!(poller.is_due(t0 + Duration::from_secs(5)));

        poller.mark_sent(t0 + Duration::from_secs(5));
        assert!(!poller.is_due(t0 + Duration::from_secs(20)));
        poller.mark_done();
        assert!(poller.is_due(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn zero_interval_disables_polling() {
        let poller = UpdatePoller::new(Duration::ZERO);
        assert!(!poller.is_due(Instant::now()));
    }
}
