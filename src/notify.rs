use chrono::{DateTime, Duration, Local};
use std::collections::VecDeque;

/// Fire-and-forget warnings for the user.
pub trait Notifier {
    fn warn(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub at: DateTime<Local>,
}

/// Short-lived messages shown in the status line.
#[derive(Debug, Clone)]
pub struct Toasts {
    queue: VecDeque<Toast>,
    ttl: Duration,
}

impl Toasts {
    const MAX: usize = 3;

    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            ttl,
        }
    }

    pub fn push_at(&mut self, message: &str, at: DateTime<Local>) {
        if self.queue.len() == Self::MAX {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            message: message.to_string(),
            at,
        });
    }

    /// Drops toasts older than the configured lifetime.
    pub fn expire(&mut self, now: DateTime<Local>) {
        self.queue.retain(|t| now - t.at < self.ttl);
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Notifier for Toasts {
    fn warn(&mut self, message: &str) {
        tracing::warn!(toast = message, "notifying");
        self.push_at(message, Local::now());
    }
}

/// Used by the command line, where there is no status line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn warn(&mut self, message: &str) {
        tracing::warn!("{}", message);
        eprintln!("warning: {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire() {
        let mut toasts = Toasts::new(Duration::seconds(4));
        let start = Local::now();
        toasts.push_at("first", start);
        toasts.push_at("second", start + Duration::seconds(3));
        toasts.expire(start + Duration::seconds(5));
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.latest().unwrap().message, "second");
        toasts.expire(start + Duration::seconds(10));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_toasts_are_bounded() {
        let mut toasts = Toasts::new(Duration::seconds(60));
        for i in 0..5 {
            toasts.warn(&format!("message {i}"));
        }
        assert_eq!(toasts.len(), 3);
        assert_eq!(toasts.latest().unwrap().message, "message 4");
    }
}
