//! Failed-login throttling
//!
//! Counts failed sign-ins per username. After `max_attempts` failures inside
//! `window_seconds` the username is locked for `ban_duration_seconds`. A
//! successful sign-in clears the counter.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of failures allowed
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,       // 5 minutes
            ban_duration_seconds: 900, // 15 minutes
        }
    }
}

#[derive(Debug)]
struct RateLimiterEntry {
    failures: u32,
    first_failure: Instant,
    ban_expires: Option<Instant>,
}

/// Rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether `key` may attempt to sign in now
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        match entries.get(key).and_then(|entry| entry.ban_expires) {
            Some(ban_expires) if now < ban_expires => false,
            Some(_) => {
                // Ban expired
                entries.remove(key);
                true
            }
            None => true,
        }
    }

    /// Count a failed sign-in for `key`
    pub async fn record_failure(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_seconds);

        let entry = entries.entry(key.to_string()).or_insert(RateLimiterEntry {
            failures: 0,
            first_failure: now,
            ban_expires: None,
        });

        if now.duration_since(entry.first_failure) >= window {
            entry.failures = 0;
            entry.first_failure = now;
        }

        entry.failures += 1;
        if entry.failures >= self.config.max_attempts {
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            info!(
                "Locked sign-in for {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
        }
    }

    /// Forget the failures of `key`
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}
