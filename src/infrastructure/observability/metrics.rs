//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

static SESSION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"session_\d+_[0-9a-z]+").expect("valid session id pattern"));

static PATH_SEGMENT_AFTER_COLLECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/api/(chat|conversations|sessions)/([^/{]+)")
        .expect("valid collection pattern")
});

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("support_desk_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!(path = %config.path, "Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize Prometheus metrics");
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record one upstream completion round trip
pub fn record_llm_request(provider: &str, model: &str, duration: Duration, outcome: LlmOutcome) {
    let labels = [
        ("provider", provider.to_string()),
        ("model", model.to_string()),
        ("status", outcome.label().to_string()),
    ];

    counter!("llm_requests_total", &labels).increment(1);
    histogram!("llm_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if let LlmOutcome::Success { tokens } = outcome {
        counter!("llm_tokens_total", &labels).increment(u64::from(tokens));
    }
}

/// Result of an upstream completion call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmOutcome {
    Success { tokens: u32 },
    Error,
    Timeout,
}

impl LlmOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Error => "error",
            Self::Timeout => "timeout",
        }
    }
}

/// Record a completion cache lookup
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("completion_cache_lookups_total", "result" => result).increment(1);
}

/// Record a request rejected by the rate limiter
pub fn record_rate_limited() {
    counter!("http_rate_limited_total").increment(1);
}

/// Collapse per-session path segments so label cardinality stays bounded
fn sanitize_path(path: &str) -> String {
    let path = SESSION_ID.replace_all(path, "{id}");
    let path = PATH_SEGMENT_AFTER_COLLECTION.replace(&path, "/api/$1/{id}");

    path.chars().take(50).collect()
}
