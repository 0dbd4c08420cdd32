//! Unauthenticated endpoints for orchestrators and scrapers.
//!
//! `/readyz` turns 503 once shutdown begins so load balancers stop routing
//! new requests while in-flight ones finish. `/metrics` appends the store's
//! row counts to the gateway counters.

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::app_state::AppState;

const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4; charset=utf-8";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn readyz(State(app): State<AppState>) -> (StatusCode, &'static str) {
    match app.is_draining() {
        true => (StatusCode::SERVICE_UNAVAILABLE, "draining"),
        false => (StatusCode::OK, "ready"),
    }
}

async fn metrics(State(app): State<AppState>) -> Response {
    let gauges = app.metrics_extra();
    let body = app.metrics().render(&gauges);
    ([(CONTENT_TYPE, PROMETHEUS_TEXT)], body).into_response()
}
