//! Deadline-based timers on a logical clock.
//!
//! Every self-driving component keeps its pending timers as absolute deadlines
//! measured from mount. The host (browser `setTimeout`, or [`Driver`] in tests)
//! asks for the earliest deadline, waits until then, and calls [`Timed::fire`].
//! Nothing here reads a wall clock.

use std::time::Duration;

/// A state machine whose transitions are driven by deadlines.
pub trait Timed {
    /// Earliest pending deadline, or `None` when nothing is scheduled.
    fn next_deadline(&self) -> Option<Duration>;

    /// Run every transition that is due at `now`.
    fn fire(&mut self, now: Duration);
}

/// A single cancellable deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Duration>);

impl Deadline {
    pub fn idle() -> Self {
        Self(None)
    }

    /// Arm (or re-arm) the deadline `delay` after `now`. Any previous
    /// deadline is replaced.
    pub fn arm(&mut self, now: Duration, delay: Duration) {
        self.0 = Some(now.saturating_add(delay));
    }

    pub fn cancel(&mut self) {
        self.0 = None;
    }

    pub fn at(&self) -> Option<Duration> {
        self.0
    }

    pub fn is_armed(&self) -> bool {
        self.0.is_some()
    }

    /// Disarm and report `true` when the deadline has been reached.
    pub fn take_if_due(&mut self, now: Duration) -> bool {
        match self.0 {
            Some(at) if at <= now => {
                self.0 = None;
                true
            }
            _ => false,
        }
    }
}

/// Earliest of several optional deadlines.
pub fn earliest(deadlines: &[Option<Duration>]) -> Option<Duration> {
    deadlines.iter().flatten().min().copied()
}

/// Deterministic driver for a [`Timed`] machine on a logical clock.
#[derive(Debug)]
pub struct Driver<T> {
    now: Duration,
    machine: T,
}

impl<T: Timed> Driver<T> {
    pub fn new(machine: T) -> Self {
        Self {
            now: Duration::ZERO,
            machine,
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn machine(&self) -> &T {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut T {
        &mut self.machine
    }

    /// Move the clock forward by `delta`, firing each deadline in order.
    pub fn advance(&mut self, delta: Duration) {
        let target = self.now.saturating_add(delta);
        self.advance_to(target);
    }

    /// Move the clock to `target`, firing each deadline in order.
    ///
    /// `observe` is called after every fire with the machine in its new
    /// state, which lets tests record intermediate values.
    pub fn advance_to_with(&mut self, target: Duration, mut observe: impl FnMut(Duration, &T)) {
        while let Some(deadline) = self.machine.next_deadline() {
            if deadline > target {
                break;
            }
            self.now = deadline.max(self.now);
            self.machine.fire(self.now);
            observe(self.now, &self.machine);
        }
        self.now = target.max(self.now);
    }

    pub fn advance_to(&mut self, target: Duration) {
        self.advance_to_with(target, |_, _| {});
    }

    pub fn into_inner(self) -> T {
        self.machine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ticker {
        every: Duration,
        deadline: Deadline,
        fired_at: Vec<Duration>,
    }

    impl Timed for Ticker {
        fn next_deadline(&self) -> Option<Duration> {
            self.deadline.at()
        }

        fn fire(&mut self, now: Duration) {
            if self.deadline.take_if_due(now) {
                self.fired_at.push(now);
                self.deadline.arm(now, self.every);
            }
        }
    }

    #[test]
    fn driver_fires_deadlines_in_order_up_to_target() {
        let mut ticker = Ticker {
            every: Duration::from_millis(10),
            ..Default::default()
        };
        ticker.deadline.arm(Duration::ZERO, Duration::from_millis(10));

        let mut driver = Driver::new(ticker);
        driver.advance(Duration::from_millis(35));

        assert_eq!(
            driver.machine().fired_at,
            vec![
                Duration::from_millis(10),
                Duration::from_millis(20),
                Duration::from_millis(30),
            ]
        );
        assert_eq!(driver.now(), Duration::from_millis(35));
        assert_eq!(driver.machine().next_deadline(), Some(Duration::from_millis(40)));
    }

    #[test]
    fn rearming_replaces_previous_deadline() {
        let mut deadline = Deadline::idle();
        deadline.arm(Duration::from_secs(1), Duration::from_secs(10));
        deadline.arm(Duration::from_secs(3), Duration::from_secs(10));

        assert!(!deadline.take_if_due(Duration::from_secs(11)));
        assert!(deadline.take_if_due(Duration::from_secs(13)));
        assert!(!deadline.is_armed());
    }

    #[test]
    fn earliest_ignores_idle_slots() {
        assert_eq!(earliest(&[None, None]), None);
        assert_eq!(
            earliest(&[None, Some(Duration::from_millis(7)), Some(Duration::from_millis(3))]),
            Some(Duration::from_millis(3))
        );
    }
}
