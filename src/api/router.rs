use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Uri},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::health;
use super::middleware::security::MAX_BODY_SIZE;
use super::middleware::{
    logging_middleware, metrics_middleware, rate_limit_middleware, request_guard_middleware,
    security_headers_middleware,
};
use super::state::AppState;
use super::support;
use super::types::ApiError;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let mut api = support::create_support_router();
    if let Some(limiter) = state.rate_limiter.clone() {
        api = api.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
    }

    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", api)
        .fallback(endpoint_not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_guard_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Allow-listed origins with credentials; requests without an origin pass untouched.
///
/// A wildcard cannot be combined with credentials, so `*` entries are skipped.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|origin| {
            let wildcard = origin.trim() == "*";
            if wildcard {
                warn!("Ignoring wildcard CORS origin; list origins explicitly");
            }
            !wildcard
        })
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn endpoint_not_found(method: Method, uri: Uri) -> ApiError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    ApiError::not_found("Endpoint not found").with_request(method.as_str(), path)
}
