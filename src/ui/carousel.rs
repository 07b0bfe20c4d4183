//! Autoplaying carousel index with a cooldown after manual navigation.

use std::time::Duration;

use super::schedule::{earliest, Deadline, Timed};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    index: usize,
    auto_playing: bool,
    interval: Duration,
    cooldown: Duration,
    advance: Deadline,
    resume: Deadline,
}

impl Carousel {
    pub fn new(len: usize, interval: Duration, cooldown: Duration, now: Duration) -> Self {
        let mut carousel = Self {
            len,
            index: 0,
            auto_playing: true,
            interval: interval.max(Duration::from_millis(1)),
            cooldown,
            advance: Deadline::idle(),
            resume: Deadline::idle(),
        };
        carousel.start_auto_play(now);
        carousel
    }

    pub fn with_defaults(len: usize, now: Duration) -> Self {
        Self::new(len, DEFAULT_INTERVAL, DEFAULT_COOLDOWN, now)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_playing
    }

    pub fn next(&mut self, now: Duration) {
        if self.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.len;
        self.pause_for_cooldown(now);
    }

    pub fn previous(&mut self, now: Duration) {
        if self.is_empty() {
            return;
        }
        self.index = (self.index + self.len - 1) % self.len;
        self.pause_for_cooldown(now);
    }

    /// Jump straight to `index`. Out-of-range targets are ignored.
    pub fn jump(&mut self, index: usize, now: Duration) -> bool {
        if index >= self.len {
            return false;
        }
        self.index = index;
        self.pause_for_cooldown(now);
        true
    }

    pub fn unmount(&mut self) {
        self.advance.cancel();
        self.resume.cancel();
    }

    fn start_auto_play(&mut self, now: Duration) {
        self.auto_playing = true;
        if self.len > 0 {
            self.advance.arm(now, self.interval);
        }
    }

    fn pause_for_cooldown(&mut self, now: Duration) {
        self.auto_playing = false;
        self.advance.cancel();
        self.resume.arm(now, self.cooldown);
    }
}

impl Timed for Carousel {
    fn next_deadline(&self) -> Option<Duration> {
        earliest(&[self.advance.at(), self.resume.at()])
    }

    fn fire(&mut self, now: Duration) {
        if let Some(at) = self.resume.at() {
            if self.resume.take_if_due(now) {
                self.start_auto_play(at);
            }
        }

        while let Some(at) = self.advance.at() {
            if !self.advance.take_if_due(now) {
                break;
            }
            self.index = (self.index + 1) % self.len;
            self.advance.arm(at, self.interval);
        }
    }
}
