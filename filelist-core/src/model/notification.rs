//! `src/model/notification.rs`
//!
//! Messages the widget queues for its host: failed actions, failed directory
//! changes. The host drains the queue and decides how to show them.

use std::collections::VecDeque;
use std::time::Instant;

use compact_str::CompactString;

/// Oldest messages are dropped past this many.
const MAX_PENDING: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationLevel {
    Info = 0,
    Success = 1,
    Warning = 2,
    Error = 3,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: CompactString,
    pub level: NotificationLevel,
    pub timestamp: Instant,
    pub auto_dismiss_ms: Option<u32>,
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn push(
        &mut self,
        message: impl Into<CompactString>,
        level: NotificationLevel,
        auto_dismiss_ms: Option<u32>,
    ) {
        if self.pending.len() == MAX_PENDING {
            self.pending.pop_front();
        }
        self.pending.push_back(Notification {
            message: message.into(),
            level,
            timestamp: Instant::now(),
            auto_dismiss_ms,
        });
    }

    #[inline]
    pub fn info(&mut self, message: impl Into<CompactString>) {
        self.push(message, NotificationLevel::Info, Some(3000));
    }

    #[inline]
    pub fn success(&mut self, message: impl Into<CompactString>) {
        self.push(message, NotificationLevel::Success, Some(2000));
    }

    #[inline]
    pub fn warning(&mut self, message: impl Into<CompactString>) {
        self.push(message, NotificationLevel::Warning, Some(4000));
    }

    #[inline]
    pub fn error(&mut self, message: impl Into<CompactString>) {
        self.push(message, NotificationLevel::Error, None);
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_in_order_and_bounded() {
        let mut queue = NotificationQueue::default();
        for i in 0..MAX_PENDING + 2 {
            queue.info(format!("msg {i}"));
        }
        queue.error("boom");

        let all = queue.drain();
        assert_eq!(all.len(), MAX_PENDING);
        assert_eq!(all[0].message, "msg 3");
        assert_eq!(all.last().unwrap().level, NotificationLevel::Error);
        assert!(queue.is_empty());
    }
}
