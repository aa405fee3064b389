use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::config::MAX_RATE_WINDOW;
use crate::metrics::RATE_LIMIT_ENTRIES;

// Rate limit entry - tracks requests per IP in a fixed window
#[derive(Debug, Clone, Copy)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: Instant,
}

impl RateLimitEntry {
    fn expired(&self, now: Instant) -> bool {
        self.reset_at < now
    }
}

/// Fixed-window request counter keyed by client IP.
///
/// Counts are local to this process; several instances behind a load
/// balancer each enforce their own limit.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    limit: u32,
    window: Duration,
    sweep_threshold: usize,
}

impl RateLimiter {
    /// `window` is clamped to [`MAX_RATE_WINDOW`] so window ends stay representable.
    pub fn new(limit: u32, window: Duration, sweep_threshold: usize) -> Self {
        Self {
            entries: DashMap::new(),
            limit,
            window: window.min(MAX_RATE_WINDOW),
            sweep_threshold,
        }
    }

    /// Records a request from `ip`; returns `false` once the window's quota is spent.
    pub fn check(&self, ip: &str) -> bool {
        self.check_at(ip, Instant::now())
    }

    pub fn check_at(&self, ip: &str, now: Instant) -> bool {
        if self.entries.len() > self.sweep_threshold {
            self.sweep_expired(now);
        }

        let mut entry = self
            .entries
            .entry(ip.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                reset_at: now + self.window,
            });

        // window expired..? start a new one
        if entry.expired(now) {
            entry.count = 1;
            entry.reset_at = now + self.window;
            return true;
        }

        entry.count = entry.count.saturating_add(1);
        entry.count <= self.limit
    }

    /// Drops every entry whose window has ended. Returns how many were removed.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.expired(now));
        let removed = before.saturating_sub(self.entries.len());
        RATE_LIMIT_ENTRIES.set(self.entries.len() as f64);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Periodic cleanup so the table stays bounded even below the inline threshold
pub async fn sweeper(limiter: Arc<RateLimiter>, every: Duration) {
    let mut interval = interval(every);

    tracing::info!(interval = ?every, "rate-limit sweeper started");

    loop {
        interval.tick().await;
        let removed = limiter.sweep_expired(Instant::now());
        if removed > 0 {
            tracing::debug!(removed, "swept expired rate-limit entries");
        }
    }
}
