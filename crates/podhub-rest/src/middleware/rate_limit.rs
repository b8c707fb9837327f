//! Per-client request rate limiting.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    middleware::StateInformationMiddleware,
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};
use podhub_config::RateLimitConfig;
use podhub_core::PodhubError;
use podhub_security::Claims;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::warn;

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

type KeyedLimiter =
    RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock, StateInformationMiddleware>;

/// Rate limit middleware state: one token bucket per client key.
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Arc<KeyedLimiter>,
    limit: u32,
    enabled: bool,
}

impl RateLimitState {
    /// Allows `requests_per_minute` requests per client, refilled evenly over the minute.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let limit = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let limiter = RateLimiter::keyed(Quota::per_minute(limit))
            .with_middleware::<StateInformationMiddleware>();
        Self {
            limiter: Arc::new(limiter),
            limit: limit.get(),
            enabled: true,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            ..Self::per_minute(config.requests_per_minute)
        }
    }

    /// Drops buckets that have refilled completely.
    pub fn prune(&self) {
        self.limiter.retain_recent();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    fn set_headers(&self, headers: &mut HeaderMap, remaining: u32) {
        headers.insert(LIMIT_HEADER, HeaderValue::from(self.limit));
        headers.insert(REMAINING_HEADER, HeaderValue::from(remaining));
    }
}

impl std::fmt::Debug for RateLimitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitState")
            .field("limit", &self.limit)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Identifies the caller: the authenticated user when there is one, otherwise the client address.
fn client_key(request: &Request<Body>) -> String {
    if let Some(claims) = request.extensions().get::<Claims>() {
        return format!("api:{}", claims.sub);
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    // Without connect info (e.g. in-process tests) fall back to the forwarded chain.
    let ip = peer
        .or_else(|| {
            request
                .headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.split(',').next())
                .map(|ip| ip.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());

    format!("api:{ip}")
}

/// Answers 429 once a client exceeds its quota. Every response carries
/// `X-RateLimit-Limit` and `X-RateLimit-Remaining`.
///
/// Must run after [`super::auth_middleware`] so authenticated callers are keyed by user.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.enabled {
        return next.run(request).await;
    }

    let key = client_key(&request);
    match state.limiter.check_key(&key) {
        Ok(snapshot) => {
            let mut response = next.run(request).await;
            state.set_headers(response.headers_mut(), snapshot.remaining_burst_capacity());
            response
        }
        Err(not_until) => {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            warn!(client = %key, retry_after_secs = wait.as_secs(), "Rate limit exceeded");

            let mut response = AppError(PodhubError::RateLimitExceeded).into_response();
            state.set_headers(response.headers_mut(), 0);
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(wait.as_secs().max(1)));
            response
        }
    }
}
