//! HTTP surface: the metrics endpoint, a liveness probe and a redirect for
//! everything else.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::collector::Exporter;
use crate::metrics;

#[derive(Debug, Clone)]
struct AppState {
    exporter: Exporter,
    telemetry_path: Arc<str>,
}

/// Builds the router serving `telemetry_path` from `exporter`.
pub fn router(exporter: Exporter, telemetry_path: &str) -> Router {
    let state = AppState {
        exporter,
        telemetry_path: Arc::from(telemetry_path),
    };

    Router::new()
        .route(telemetry_path, get(metrics_handler))
        .route("/health", get(health_handler))
        .fallback(redirect_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let samples = state.exporter.collect().await;
    match metrics::render(&samples) {
        Ok(body) => ([(header::CONTENT_TYPE, metrics::content_type())], body).into_response(),
        Err(e) => {
            error!(error = %e, "Can't encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn redirect_handler(State(state): State<AppState>) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, state.telemetry_path.to_string())],
    )
        .into_response()
}
