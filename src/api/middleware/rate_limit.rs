//! Per-client request throttling for the `/api` routes

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::api::types::ApiError;
use crate::infrastructure::observability::record_rate_limited;
use crate::infrastructure::rate_limit::{RateLimitDecision, RateLimiter};

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Counts the request against its client and answers 429 once the window is full
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_key(&request);
    let decision = limiter.check_and_record(&client).await;

    if !decision.allowed {
        warn!(client = %client, "Rate limit exceeded");
        record_rate_limited();

        let mut response = ApiError::rate_limited(RATE_LIMIT_MESSAGE).into_response();
        apply_headers(response.headers_mut(), &decision);
        return response;
    }

    let mut response = next.run(request).await;
    apply_headers(response.headers_mut(), &decision);
    response
}

/// Peer address, then the first `x-forwarded-for` hop, then "unknown"
pub fn client_key(request: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert("ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("ratelimit-reset", HeaderValue::from(decision.reset_in_seconds));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_key_prefers_peer_address() {
        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4000))));

        assert_eq!(client_key(&request), "10.0.0.1");
    }

    #[test]
    fn test_client_key_uses_first_forwarded_hop() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.2")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&request), "203.0.113.9");
    }

    #[test]
    fn test_client_key_unknown() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&request), "unknown");
    }
}
