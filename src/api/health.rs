//! Health check endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

/// `GET /health` body
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

/// Readiness response with component status
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub checks: Vec<HealthCheck>,
    pub latency_ms: u64,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness with the running environment
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
        environment: state.environment.clone(),
    })
}

/// Readiness: storage must answer; an empty documentation set only degrades
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let storage = match state.session_service.list().await {
        Ok(_) => HealthCheck {
            name: "storage",
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => HealthCheck {
            name: "storage",
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
        },
    };

    let document_count = state.documents.documents().len();
    let documents = HealthCheck {
        name: "documents",
        status: if document_count > 0 {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
        message: Some(format!("{} loaded", document_count)),
    };

    let overall = overall_status(&[&storage, &documents]);
    let status_code = match overall {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    (
        status_code,
        Json(ReadinessResponse {
            status: overall,
            version: env!("CARGO_PKG_VERSION"),
            checks: vec![storage, documents],
            latency_ms: start.elapsed().as_millis() as u64,
        }),
    )
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

fn overall_status(checks: &[&HealthCheck]) -> HealthStatus {
    if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}
