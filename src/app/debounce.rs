//! Cancellable delayed commit for the search prompt.
//!
//! Each `schedule` replaces the pending value and restarts the delay, so
//! the last keystroke inside the window wins. The event loop calls `poll`
//! on every tick; there is no timer thread.
//!
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending commit and schedule `value` for `now + delay`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().map(|(_, due)| *due)?;
        if now >= due { self.flush() } else { None }
    }

    /// Take the pending value right away, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_commits_before_deadline() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.schedule("a", t0);
        assert_eq!(d.poll(t0 + Duration::from_millis(299)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(300)), Some("a"));
        assert_eq!(d.poll(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn each_keystroke_restarts_the_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.schedule("b", t0);
        d.schedule("bo", t0 + Duration::from_millis(200));
        d.schedule("bob", t0 + Duration::from_millis(400));
        assert_eq!(d.poll(t0 + Duration::from_millis(650)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(700)), Some("bob"));
    }

    #[test]
    fn flush_and_cancel() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.schedule(1, t0);
        assert!(d.is_pending());
        assert_eq!(d.flush(), Some(1));
        d.schedule(2, t0);
        d.cancel();
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
    }
}
