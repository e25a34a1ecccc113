//! Autosave debounce.
//!
//! Edits arrive on every keystroke; persisting each one would hammer the
//! store, so saves wait for a quiet period. Each recorded edit replaces the
//! pending payload and re-arms a single deadline, so one quiescence produces
//! exactly one write. The clock is passed in, which keeps the timing logic
//! deterministic under test.

use std::time::{Duration, Instant};

/// Default quiet period before an edit is persisted.
pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(1);

pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record an edit. Replaces any pending payload and restarts the quiet
    /// period from `now`.
    pub fn record(&mut self, content: String, now: Instant) {
        self.pending = Some((content, now + self.delay));
    }

    /// Take the pending payload if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => {
                self.pending.take().map(|(content, _)| content)
            }
            _ => None,
        }
    }

    /// Take the pending payload immediately, deadline or not. Used on
    /// session exit so the last edit is never lost.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(content, _)| content)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(AUTOSAVE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_before_deadline_returns_nothing() {
        let mut debouncer = Debouncer::new(Duration::from_secs(1));
        let start = Instant::now();

        debouncer.record("a".to_string(), start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
        assert!(debouncer.is_pending());
    }

    #[test]
    fn test_poll_after_deadline_drains() {
        let mut debouncer = Debouncer::new(Duration::from_secs(1));
        let start = Instant::now();

        debouncer.record("a".to_string(), start);
        assert_eq!(
            debouncer.poll(start + Duration::from_secs(1)),
            Some("a".to_string())
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_secs(2)), None);
    }

    #[test]
    fn test_rapid_edits_coalesce_to_last_write() {
        let mut debouncer = Debouncer::new(Duration::from_secs(1));
        let start = Instant::now();

        debouncer.record("a".to_string(), start);
        debouncer.record("ab".to_string(), start + Duration::from_millis(300));
        debouncer.record("abc".to_string(), start + Duration::from_millis(600));

        // The earlier deadlines were cancelled by the later edits.
        assert_eq!(debouncer.poll(start + Duration::from_millis(1100)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(1600)),
            Some("abc".to_string())
        );
    }

    #[test]
    fn test_flush_ignores_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_secs(1));
        let start = Instant::now();

        debouncer.record("a".to_string(), start);
        assert_eq!(debouncer.flush(), Some("a".to_string()));
        assert_eq!(debouncer.flush(), None);
    }
}
