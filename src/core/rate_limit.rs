use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const CLEANUP_THRESHOLD: usize = 4096;

/// In-process fixed-window rate limiter keyed by caller-supplied strings.
/// Windows are kept in memory; a restart resets all counters.
pub(crate) struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

struct Window {
    started: Instant,
    count: u64,
}

impl RateLimiter {
    pub(crate) fn new() -> Self {
        Self { windows: Mutex::new(HashMap::new()) }
    }

    /// Records a hit for `key` and returns whether it is within `limit`
    /// hits per `window`.
    pub(crate) fn check(&self, key: &str, limit: u64, window: Duration) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if windows.len() > CLEANUP_THRESHOLD {
            windows.retain(|_, entry| now.duration_since(entry.started) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window { started: now, count: 0 });
        if now.duration_since(entry.started) >= window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;
        entry.count <= limit
    }
}
