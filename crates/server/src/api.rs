//! HTTP API for trip planning, health checks and Prometheus metrics

use hos_lib::{
    error::ErrorBody,
    health::{components, ComponentStatus, HealthRegistry},
    models::TripRequest,
    observability::SchedulerMetrics,
    TripScheduler,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
pub struct AppState {
    pub scheduler: Arc<TripScheduler>,
    pub health_registry: HealthRegistry,
    pub metrics: SchedulerMetrics,
}

impl AppState {
    pub fn new(
        scheduler: TripScheduler,
        health_registry: HealthRegistry,
        metrics: SchedulerMetrics,
    ) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
            health_registry,
            metrics,
        }
    }
}

fn internal_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            kind: "internal".to_string(),
            message,
        }),
    )
        .into_response()
}

/// Plan a trip; 201 with the schedule, 422 with `{kind, message}` on rejection
async fn plan_trip(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TripRequest>,
) -> Response {
    let scheduler = Arc::clone(&state.scheduler);
    // Stop lookups may block up to their timeout
    let result =
        tokio::task::spawn_blocking(move || scheduler.schedule_with_outcome(&request)).await;

    match result {
        Ok(Ok(outcome)) => {
            state
                .health_registry
                .record_lookup_fallbacks(outcome.location_fallbacks)
                .await;
            (StatusCode::CREATED, Json(outcome.schedule)).into_response()
        }
        Ok(Err(e)) => {
            info!(kind = e.kind(), error = %e, "Rejected planning request");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(e.to_failure())).into_response()
        }
        Err(e) => {
            error!(error = %e, "Planning task failed");
            state.metrics.inc_planning_errors("internal");
            state
                .health_registry
                .set_degraded(components::PLANNER, format!("planning task failed: {}", e))
                .await;
            internal_error("planning task failed".to_string())
        }
    }
}

async fn limits(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.scheduler.limits().clone())
}

/// Health check response - 200 while operational, 503 when unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return internal_error(e.to_string());
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/trips/plan", post(plan_trip))
        .route("/api/v1/limits", get(limits))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Bind and serve until the task is dropped
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
