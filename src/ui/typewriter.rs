//! Character-by-character reveal and delete cycle over a fixed word list.

use std::time::Duration;

use super::schedule::{Deadline, Timed};

pub const DEFAULT_TYPING_SPEED: Duration = Duration::from_millis(100);
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(2_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    PausedAfterTyping,
    Deleting,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    words: Vec<String>,
    speed: Duration,
    pause: Duration,
    word_index: usize,
    revealed: usize,
    phase: Phase,
    deadline: Deadline,
}

impl Typewriter {
    /// Mount at logical time `now`; the first character appears one typing
    /// interval later.
    pub fn new(words: Vec<String>, speed: Duration, pause: Duration, now: Duration) -> Self {
        // a zero interval would never let the clock move past a tick
        let speed = speed.max(Duration::from_millis(2));
        let mut deadline = Deadline::idle();
        if !words.is_empty() {
            deadline.arm(now, speed);
        }

        Self {
            words,
            speed,
            pause,
            word_index: 0,
            revealed: 0,
            phase: Phase::Typing,
            deadline,
        }
    }

    pub fn with_defaults(words: Vec<String>, now: Duration) -> Self {
        Self::new(words, DEFAULT_TYPING_SPEED, DEFAULT_PAUSE, now)
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Currently displayed prefix of the active word.
    pub fn text(&self) -> &str {
        let Some(word) = self.words.get(self.word_index) else {
            return "";
        };
        let end = word
            .char_indices()
            .nth(self.revealed)
            .map(|(offset, _)| offset)
            .unwrap_or(word.len());
        &word[..end]
    }

    /// Cancel the pending tick. The cycle only restarts through a new mount.
    pub fn unmount(&mut self) {
        self.deadline.cancel();
    }

    fn word_len(&self) -> usize {
        self.words
            .get(self.word_index)
            .map(|word| word.chars().count())
            .unwrap_or(0)
    }

    fn step(&mut self, now: Duration) {
        match self.phase {
            Phase::Typing => {
                let len = self.word_len();
                if self.revealed < len {
                    self.revealed += 1;
                }
                if self.revealed >= len {
                    self.phase = Phase::PausedAfterTyping;
                    self.deadline.arm(now, self.pause);
                } else {
                    self.deadline.arm(now, self.speed);
                }
            }
            Phase::PausedAfterTyping => {
                self.phase = Phase::Deleting;
                self.deadline.arm(now, self.speed / 2);
            }
            Phase::Deleting => {
                self.revealed = self.revealed.saturating_sub(1);
                if self.revealed == 0 {
                    self.word_index = (self.word_index + 1) % self.words.len();
                    self.phase = Phase::Typing;
                    self.deadline.arm(now, self.speed);
                } else {
                    self.deadline.arm(now, self.speed / 2);
                }
            }
        }
    }
}

impl Timed for Typewriter {
    fn next_deadline(&self) -> Option<Duration> {
        self.deadline.at()
    }

    fn fire(&mut self, now: Duration) {
        while let Some(at) = self.deadline.at() {
            if !self.deadline.take_if_due(now) {
                break;
            }
            self.step(at);
        }
    }
}
