//! src/view/scroll.rs
//!
//! Back-and-forth scrolling of a selected name too wide for its column.

use std::time::{Duration, Instant};

pub const STEP_DELAY: Duration = Duration::from_millis(100);
pub const END_PAUSE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Direction {
    #[default]
    Right,
    Left,
}

/// Animation state for one widget.
#[derive(Debug, Clone, Default)]
pub struct NameScroller {
    entry: Option<usize>,
    text: String,
    position: usize,
    direction: Direction,
    waiting: bool,
    last_step: Option<Instant>,
}

impl NameScroller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the current entry; the next overflowing name starts over.
    pub fn reset(&mut self) {
        self.entry = None;
        self.text.clear();
    }

    /// Character offset at which to show `text`, the name of entry `entry`,
    /// in `visible` cells at `now`. Starts over when either changes.
    pub fn offset(&mut self, entry: usize, text: &str, visible: usize, now: Instant) -> usize {
        let len = text.chars().count();
        if len <= visible {
            self.reset();
            return 0;
        }

        if self.entry != Some(entry) || self.text != text {
            self.entry = Some(entry);
            self.text = text.to_string();
            self.position = 0;
            self.direction = Direction::Right;
            self.waiting = true;
            self.last_step = Some(now);
        }

        let since = now.saturating_duration_since(self.last_step.unwrap_or(now));

        if !self.waiting && since > STEP_DELAY {
            self.last_step = Some(now);
            self.position = match self.direction {
                Direction::Right => self.position + 1,
                Direction::Left => self.position.saturating_sub(1),
            };
        }

        let end = len - visible;
        if self.position >= end {
            self.position = end;
            self.direction = Direction::Left;
            self.waiting = true;
        } else if self.position == 0 {
            self.direction = Direction::Right;
            self.waiting = true;
        }

        let since = now.saturating_duration_since(self.last_step.unwrap_or(now));
        if self.waiting && since > END_PAUSE {
            self.waiting = false;
        }

        self.position
    }
}
