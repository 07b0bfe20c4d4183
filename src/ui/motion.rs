//! Smooth scrolling and the transient "is scrolling" marker.

use std::time::Duration;

use super::schedule::{Deadline, Timed};

/// Height of the fixed header that anchored sections must clear.
pub const HEADER_OFFSET: f64 = 80.0;
pub const MAX_SCROLL_DURATION: Duration = Duration::from_millis(800);
pub const SCROLL_ACTIVITY_IDLE: Duration = Duration::from_millis(150);

pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
    }
}

/// One smooth scroll from the current offset to a target offset, sampled per
/// animation frame.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    start: f64,
    distance: f64,
    duration: Duration,
    started_at: Option<Duration>,
}

impl SmoothScroll {
    /// Half a millisecond per pixel, capped at [`MAX_SCROLL_DURATION`].
    /// Reduced motion jumps straight to the target.
    pub fn to_offset(current: f64, target: f64, reduced_motion: bool) -> Self {
        let distance = target - current;
        let duration = if reduced_motion {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(distance.abs() / 2.0 / 1_000.0).min(MAX_SCROLL_DURATION)
        };

        Self {
            start: current,
            distance,
            duration,
            started_at: None,
        }
    }

    /// Scroll so that an element whose top edge is `element_top` pixels below
    /// the viewport top ends up just under the header.
    pub fn to_element(current: f64, element_top: f64, reduced_motion: bool) -> Self {
        Self::to_offset(current, current + element_top - HEADER_OFFSET, reduced_motion)
    }

    pub fn target(&self) -> f64 {
        self.start + self.distance
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Position for the frame at `timestamp`, and whether this is the last
    /// frame. The first sampled frame defines the start time.
    pub fn sample(&mut self, timestamp: Duration) -> (f64, bool) {
        let started_at = *self.started_at.get_or_insert(timestamp);
        if self.duration.is_zero() {
            return (self.target(), true);
        }

        let elapsed = timestamp.saturating_sub(started_at);
        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        let position = self.start + self.distance * ease_in_out_cubic(progress);
        (position, progress >= 1.0)
    }
}

/// Marker that is set while the page scrolls and cleared once scrolling has
/// been idle for [`SCROLL_ACTIVITY_IDLE`].
#[derive(Debug, Default)]
pub struct ScrollActivity {
    active: bool,
    idle: Deadline,
}

impl ScrollActivity {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns `true` when the marker was just switched on.
    pub fn on_scroll(&mut self, now: Duration) -> bool {
        self.idle.arm(now, SCROLL_ACTIVITY_IDLE);
        let became_active = !self.active;
        self.active = true;
        became_active
    }

    pub fn unmount(&mut self) {
        self.idle.cancel();
        self.active = false;
    }
}

impl Timed for ScrollActivity {
    fn next_deadline(&self) -> Option<Duration> {
        self.idle.at()
    }

    fn fire(&mut self, now: Duration) {
        if self.idle.take_if_due(now) {
            self.active = false;
        }
    }
}
