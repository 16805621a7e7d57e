//! Single-key fetch cache for the user list.
//!
//! - one request in flight at a time; extra requests are ignored
//! - failed attempts are retried with exponential back-off
//! - successful data stays fresh for `stale_after`, after which
//!   [`FetchCache::ensure_fresh`] starts a background refresh
//!
//! Network work runs on a short-lived worker thread; the UI thread picks
//! the outcome up with [`FetchCache::poll`]. Dropping the cache drops the
//! receiver, so a late result is simply discarded.
//!
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use super::{FetchError, UserSource};
use crate::model::User;

/// Cache key of the directory list.
pub const USERS_KEY: &str = "users";

type Outcome = Result<Vec<User>, FetchError>;

#[derive(Clone, Debug)]
pub struct CachePolicy {
    /// Extra attempts after the first failure.
    pub retries: u32,
    pub retry_base: Duration,
    pub retry_cap: Duration,
    pub stale_after: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            retry_base: Duration::from_secs(1),
            retry_cap: Duration::from_secs(30),
            stale_after: Duration::from_secs(5 * 60),
        }
    }
}

impl CachePolicy {
    /// Delay before retry number `attempt` (0-based): base * 2^attempt, capped.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.retry_base.saturating_mul(factor).min(self.retry_cap)
    }
}

/// Run one fetch, retrying failures up to `policy.retries` times.
pub fn fetch_with_retry(source: &dyn UserSource, policy: &CachePolicy) -> Outcome {
    let mut attempt = 0;
    loop {
        match source.fetch_users() {
            Ok(users) => return Ok(users),
            Err(err) if attempt < policy.retries => {
                let delay = policy.retry_delay(attempt);
                tracing::warn!(attempt = attempt + 1, ?delay, error = %err, "fetch failed, retrying");
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

pub struct FetchCache {
    key: &'static str,
    source: Arc<dyn UserSource>,
    policy: CachePolicy,
    data: Option<Vec<User>>,
    error: Option<FetchError>,
    updated_at: Option<Instant>,
    in_flight: Option<Receiver<Outcome>>,
    generation: u64,
}

impl FetchCache {
    pub fn new(source: Arc<dyn UserSource>, policy: CachePolicy) -> Self {
        Self {
            key: USERS_KEY,
            source,
            policy,
            data: None,
            error: None,
            updated_at: None,
            in_flight: None,
            generation: 0,
        }
    }

    /// Cached users, empty before the first success.
    pub fn data(&self) -> &[User] {
        self.data.as_deref().unwrap_or(&[])
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// First load: a request is running and nothing is cached yet.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some() && self.data.is_none()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Error of the most recent settled fetch, cleared by the next success.
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Bumped every time new data lands.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn updated_at(&self) -> Option<Instant> {
        self.updated_at
    }

    pub fn is_stale(&self, now: Instant) -> bool {
        match self.updated_at {
            Some(at) => now.saturating_duration_since(at) >= self.policy.stale_after,
            None => true,
        }
    }

    /// Start a fetch if nothing fresh is cached. Returns whether one started.
    pub fn ensure_fresh(&mut self, now: Instant) -> bool {
        if !self.is_stale(now) {
            return false;
        }
        self.start()
    }

    /// Start a fetch regardless of freshness. Returns whether one started.
    pub fn refetch(&mut self) -> bool {
        self.start()
    }

    fn start(&mut self) -> bool {
        if self.in_flight.is_some() {
            tracing::debug!(key = self.key, "fetch already in flight");
            return false;
        }
        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        let policy = self.policy.clone();
        std::thread::spawn(move || {
            let outcome = fetch_with_retry(source.as_ref(), &policy);
            let _ = tx.send(outcome);
        });
        tracing::info!(key = self.key, "fetch started");
        self.in_flight = Some(rx);
        true
    }

    /// Collect a finished fetch, if any. Returns true when state changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(rx) = &self.in_flight else {
            return false;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.settle(outcome, now);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.settle(Err(FetchError::Transport("fetch worker stopped".into())), now);
                true
            }
        }
    }

    /// Block up to `timeout` for the running fetch to settle.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let Some(rx) = &self.in_flight else {
            return false;
        };
        match rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.settle(outcome, Instant::now());
                true
            }
            Err(mpsc::RecvTimeoutError::Timeout) => false,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                self.settle(
                    Err(FetchError::Transport("fetch worker stopped".into())),
                    Instant::now(),
                );
                true
            }
        }
    }

    fn settle(&mut self, outcome: Outcome, now: Instant) {
        self.in_flight = None;
        match outcome {
            Ok(users) => {
                tracing::info!(key = self.key, count = users.len(), "fetch succeeded");
                self.data = Some(users);
                self.error = None;
                self.updated_at = Some(now);
                self.generation += 1;
            }
            Err(err) => {
                tracing::error!(key = self.key, error = %err, "fetch failed");
                self.error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails the first `failures` calls, then returns an empty list.
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    impl UserSource for Flaky {
        fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(FetchError::Status(500))
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn quick() -> CachePolicy {
        CachePolicy {
            retry_base: Duration::ZERO,
            ..CachePolicy::default()
        }
    }

    #[test]
    fn retry_delay_doubles_and_caps() {
        let p = CachePolicy::default();
        assert_eq!(p.retry_delay(0), Duration::from_secs(1));
        assert_eq!(p.retry_delay(1), Duration::from_secs(2));
        assert_eq!(p.retry_delay(10), Duration::from_secs(30));
        assert_eq!(p.retry_delay(40), Duration::from_secs(30));
    }

    #[test]
    fn two_failures_are_absorbed_by_retries() {
        let src = Flaky { failures: 2, calls: AtomicUsize::new(0) };
        assert_eq!(fetch_with_retry(&src, &quick()), Ok(Vec::new()));
        assert_eq!(src.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn third_failure_is_reported() {
        let src = Flaky { failures: 3, calls: AtomicUsize::new(0) };
        assert_eq!(fetch_with_retry(&src, &quick()), Err(FetchError::Status(500)));
        assert_eq!(src.calls.load(Ordering::SeqCst), 3);
    }

    struct Gate(Mutex<()>);

    impl UserSource for Gate {
        fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
            let _held = self.0.lock().map_err(|_| FetchError::Transport("poisoned".into()))?;
            Ok(Vec::new())
        }
    }

    #[test]
    fn only_one_request_in_flight() {
        let gate = Arc::new(Gate(Mutex::new(())));
        let guard = gate.0.lock().unwrap();
        let mut cache = FetchCache::new(gate.clone(), quick());
        assert!(cache.refetch());
        assert!(!cache.refetch());
        assert!(cache.is_loading());
        drop(guard);
        assert!(cache.wait(Duration::from_secs(5)));
        assert!(!cache.is_fetching());
        assert!(cache.has_data());
    }
}
