use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use barangay_registry::residents::{
    resident_router, ResidentFilter, ResidentRegistryService, ResidentRepository,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct FilterOption {
    pub(crate) key: &'static str,
    pub(crate) label: &'static str,
}

pub(crate) fn with_registry_routes<R>(service: Arc<ResidentRegistryService<R>>) -> axum::Router
where
    R: ResidentRepository + 'static,
{
    resident_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/residents/filters",
            axum::routing::get(filters_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Filter keys accepted by `GET /api/v1/residents?filter=`, with their display labels.
pub(crate) async fn filters_endpoint() -> Json<Vec<FilterOption>> {
    Json(
        ResidentFilter::ALL
            .into_iter()
            .map(|filter| FilterOption {
                key: filter.key(),
                label: filter.label(),
            })
            .collect(),
    )
}
