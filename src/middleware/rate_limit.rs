//! Rate limiting middleware
//!
//! Public submission endpoints (cake orders, reservations, contact messages,
//! reference image uploads, sign-up/sign-in) are throttled per client address.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::{debug, warn};

use crate::config::RateLimitConfig;
use crate::state::AppState;
use crate::utils::errors::BakeshopError;

/// Keyed token bucket shared by all throttled routes
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
}

impl RateLimitMiddleware {
    pub fn new(config: &RateLimitConfig) -> Self {
        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
        }
    }

    /// Spend one request for `key`
    pub fn check(&self, key: &str) -> Result<(), BakeshopError> {
        self.limiter
            .check_key(&key.to_string())
            .map_err(|_| BakeshopError::RateLimitExceeded)
    }

    /// Drop buckets that have fully refilled
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        debug!(tracked = self.limiter.len(), "Rate limiter cleaned up");
    }
}

/// Client key: first `X-Forwarded-For` hop, else the peer address
pub fn client_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return forwarded.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = client_key(&request);
    match state.rate_limiter.check(&key) {
        Ok(()) => next.run(request).await,
        Err(error) => {
            warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_quota_is_enforced_per_key() {
        let limiter = RateLimitMiddleware::new(&RateLimitConfig { requests_per_minute: 2 });

        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(matches!(limiter.check("10.0.0.1"), Err(BakeshopError::RateLimitExceeded)));
        assert!(limiter.check("10.0.0.2").is_ok());
    }

    #[test]
    fn test_client_key() {
        let forwarded = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&forwarded), "203.0.113.7");

        let mut direct = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&direct), "unknown");

        direct
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        assert_eq!(client_key(&direct), "192.0.2.1");
    }
}
