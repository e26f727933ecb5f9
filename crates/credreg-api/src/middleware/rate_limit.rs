//! # Per-Caller Rate Limiting
//!
//! Fixed windows keyed by the caller resolved in [`crate::auth`]. Every
//! anonymous request draws from one shared window. A rejected request
//! gets 429 with a `Retry-After` header counting the seconds until its
//! window reopens.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parking_lot::Mutex;

use credreg_core::Identity;

use crate::auth::CallerIdentity;
use crate::error::{ErrorBody, ErrorDetail};

/// Rate limiter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per caller per window.
    pub max_requests: u64,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 1000,
            window_secs: 60,
        }
    }
}

impl RateLimitConfig {
    fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum BucketKey {
    Caller(Identity),
    Anonymous,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    opened: Instant,
    used: u64,
}

/// Windows are swept for expiry once the map grows past this many keys.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Default)]
struct Buckets {
    windows: HashMap<BucketKey, Window>,
    /// At most one sweep per window length.
    last_sweep: Option<Instant>,
    #[cfg(test)]
    sweeps: usize,
}

impl Buckets {
    fn sweep_due(&self, now: Instant, length: Duration) -> bool {
        self.windows.len() >= SWEEP_THRESHOLD
            && self
                .last_sweep
                .map_or(true, |at| now.saturating_duration_since(at) >= length)
    }

    fn sweep(&mut self, now: Instant, length: Duration) {
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.opened) < length);
        self.last_sweep = Some(now);
        #[cfg(test)]
        {
            self.sweeps += 1;
        }
        tracing::debug!(
            removed = before - self.windows.len(),
            remaining = self.windows.len(),
            "swept expired rate limit windows"
        );
    }
}

/// Shared rate limiter state; clones share windows.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Arc<Mutex<Buckets>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Arc::new(Mutex::new(Buckets::default())),
        }
    }

    /// Spend one request from `key`'s window at `now`.
    ///
    /// `Err` carries the time left until the window reopens.
    fn acquire(&self, key: BucketKey, now: Instant) -> Result<(), Duration> {
        let length = self.config.window();
        let mut buckets = self.buckets.lock();

        if buckets.sweep_due(now, length) {
            buckets.sweep(now, length);
        }

        let window = buckets.windows.entry(key).or_insert(Window {
            opened: now,
            used: 0,
        });
        let elapsed = now.saturating_duration_since(window.opened);
        if elapsed >= length {
            *window = Window {
                opened: now,
                used: 0,
            };
        }

        if window.used >= self.config.max_requests {
            return Err(length.saturating_sub(elapsed));
        }
        window.used += 1;
        Ok(())
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.buckets.lock().windows.len()
    }

    #[cfg(test)]
    fn sweeps(&self) -> usize {
        self.buckets.lock().sweeps
    }
}

/// Middleware that enforces per-caller rate limits.
///
/// Must run inside [`crate::auth::auth_middleware`] so the caller is known.
pub async fn rate_limit_middleware(request: Request, next: Next) -> Response {
    let Some(limiter) = request.extensions().get::<RateLimiter>().cloned() else {
        return next.run(request).await;
    };

    let key = match request.extensions().get::<CallerIdentity>() {
        Some(caller) => BucketKey::Caller(caller.0),
        None => BucketKey::Anonymous,
    };

    match limiter.acquire(key, Instant::now()) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            tracing::warn!(?key, retry_after_secs = retry_after.as_secs(), "rate limit exceeded");
            too_many_requests(retry_after)
        }
    }
}

fn too_many_requests(retry_after: Duration) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "RATE_LIMITED".to_string(),
            message: "rate limit exceeded".to_string(),
            details: None,
        },
    };
    // Round up so clients never retry inside the closed window.
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(secs));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u64, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window_secs,
        })
    }

    fn caller(byte: u8) -> BucketKey {
        BucketKey::Caller(Identity::from_bytes([byte; 20]))
    }

    #[test]
    fn budget_is_per_caller() {
        let limiter = limiter(1, 60);
        let t0 = Instant::now();
        assert!(limiter.acquire(caller(1), t0).is_ok());
        assert!(limiter.acquire(caller(2), t0).is_ok());
        assert!(limiter.acquire(BucketKey::Anonymous, t0).is_ok());
        assert!(limiter.acquire(caller(1), t0).is_err());
    }

    #[test]
    fn rejection_reports_time_until_reopen() {
        let limiter = limiter(2, 60);
        let t0 = Instant::now();
        limiter.acquire(caller(1), t0).unwrap();
        limiter.acquire(caller(1), t0).unwrap();
        let wait = limiter
            .acquire(caller(1), t0 + Duration::from_secs(15))
            .unwrap_err();
        assert_eq!(wait, Duration::from_secs(45));
    }

    #[test]
    fn window_reopens_after_its_length() {
        let limiter = limiter(1, 10);
        let t0 = Instant::now();
        limiter.acquire(caller(1), t0).unwrap();
        assert!(limiter.acquire(caller(1), t0 + Duration::from_secs(9)).is_err());
        assert!(limiter.acquire(caller(1), t0 + Duration::from_secs(10)).is_ok());
    }

    fn numbered(n: usize) -> BucketKey {
        let mut bytes = [0u8; 20];
        bytes[..8].copy_from_slice(&(n as u64).to_be_bytes());
        BucketKey::Caller(Identity::from_bytes(bytes))
    }

    #[test]
    fn expired_windows_are_swept_at_threshold() {
        let limiter = limiter(5, 1);
        let t0 = Instant::now();
        for n in 0..SWEEP_THRESHOLD {
            limiter.acquire(numbered(n), t0).unwrap();
        }
        assert_eq!(limiter.tracked_keys(), SWEEP_THRESHOLD);
        assert_eq!(limiter.sweeps(), 0);

        limiter
            .acquire(caller(0xFF), t0 + Duration::from_secs(2))
            .unwrap();
        assert_eq!(limiter.tracked_keys(), 1);
        assert_eq!(limiter.sweeps(), 1);
    }

    #[test]
    fn live_keys_past_threshold_sweep_once_per_window() {
        let limiter = limiter(1, 60);
        let t0 = Instant::now();
        for n in 0..2 * SWEEP_THRESHOLD {
            let at = t0 + Duration::from_millis(n as u64);
            limiter.acquire(numbered(n), at).unwrap();
        }
        assert_eq!(limiter.tracked_keys(), 2 * SWEEP_THRESHOLD);
        assert_eq!(limiter.sweeps(), 1);

        // Every window above has expired by now.
        limiter
            .acquire(numbered(usize::MAX), t0 + Duration::from_secs(120))
            .unwrap();
        assert_eq!(limiter.sweeps(), 2);
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn retry_after_rounds_up() {
        let resp = too_many_requests(Duration::from_millis(1500));
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers()[header::RETRY_AFTER], "2");
    }
}
