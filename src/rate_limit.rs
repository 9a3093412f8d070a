use std::time::{Duration, Instant};

use dashmap::DashMap;

const WINDOW: Duration = Duration::from_secs(15 * 60);
const MAX_FAILURES: u32 = 5;

/// Per-username login brute force limiter.
pub struct LoginRateLimiter {
    /// username -> (failed_count, window_start)
    entries: DashMap<String, (u32, Instant)>,
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Check if login attempt is allowed. 5 failures per 15 minutes.
    /// The counter only moves in `record_failure()`. On refusal, returns the
    /// seconds left until the window reopens.
    pub fn check(&self, username: &str) -> Result<(), u64> {
        let now = Instant::now();
        let key = username.to_lowercase();

        let Some(entry) = self.entries.get(&key) else {
            return Ok(());
        };

        let (count, start) = *entry.value();
        drop(entry);

        if now.duration_since(start) > WINDOW {
            self.entries
                .remove_if(&key, |_, (_, start)| now.duration_since(*start) > WINDOW);
            return Ok(());
        }

        if count >= MAX_FAILURES {
            let elapsed = now.duration_since(start).as_secs();
            return Err(WINDOW.as_secs().saturating_sub(elapsed));
        }

        Ok(())
    }

    pub fn record_failure(&self, username: &str) {
        let now = Instant::now();

        let mut entry = self.entries.entry(username.to_lowercase()).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > WINDOW {
            *count = 1;
            *start = now;
        } else {
            *count += 1;
        }
    }

    pub fn clear(&self, username: &str) {
        self.entries.remove(&username.to_lowercase());
    }

    /// Drop every entry whose window has closed.
    pub fn cleanup(&self) {
        self.cleanup_at(Instant::now());
    }

    pub fn cleanup_at(&self, now: Instant) {
        self.entries
            .retain(|_, (_, start)| now.saturating_duration_since(*start) <= WINDOW);
    }

    /// Number of usernames currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
