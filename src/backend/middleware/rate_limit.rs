//! Per-IP rate limiting
//!
//! A token bucket per client IP: `RATE_LIMIT_MAX` requests may burst, and
//! the bucket refills at `RATE_LIMIT_MAX` per `RATE_LIMIT_WINDOW_MS`.
//! Requests without a resolvable client IP are not limited.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::warn;

use crate::backend::server::config::RateLimitConfig;

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_refill: Instant::now(),
        }
    }

    fn try_consume(&mut self, rate: f64, capacity: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.last_refill = now;

        self.tokens = (self.tokens + elapsed * rate).min(capacity);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<IpAddr, TokenBucket>>>,
    /// Tokens per second
    rate: f64,
    capacity: f64,
}

impl RateLimiter {
    pub fn new(rate: f64, capacity: f64) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            rate,
            capacity,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        let capacity = f64::from(config.max_requests.max(1));
        let window_secs = (config.window_ms.max(1) as f64) / 1000.0;
        Self::new(capacity / window_secs, capacity)
    }

    pub async fn check(&self, ip: IpAddr) -> bool {
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets
            .entry(ip)
            .or_insert_with(|| TokenBucket::new(self.capacity));
        bucket.try_consume(self.rate, self.capacity)
    }

    /// Drop buckets idle for longer than `max_idle_secs`
    pub async fn purge_stale(&self, max_idle_secs: f64) {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();
        buckets.retain(|_, bucket| now.duration_since(bucket.last_refill).as_secs_f64() < max_idle_secs);
    }

    /// Seconds after which an idle bucket is full again
    pub fn refill_secs(&self) -> f64 {
        self.capacity / self.rate
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(ip) = client_ip(&request) {
        if !limiter.check(ip).await {
            warn!(ip = %ip, "Rate limit exceeded");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "Too many requests, please try again later",
                    "status": StatusCode::TOO_MANY_REQUESTS.as_u16(),
                })),
            )
                .into_response();
        }
    }

    next.run(request).await
}

/// Try ConnectInfo first, then X-Forwarded-For, then X-Real-IP.
fn client_ip(request: &Request) -> Option<IpAddr> {
    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return Some(connect_info.0.ip());
    }

    let header = |name: &str| request.headers().get(name).and_then(|v| v.to_str().ok());

    if let Some(forwarded) = header("x-forwarded-for") {
        if let Some(ip) = forwarded.split(',').next().and_then(|first| first.trim().parse().ok()) {
            return Some(ip);
        }
    }

    header("x-real-ip").and_then(|value| value.trim().parse().ok())
}
