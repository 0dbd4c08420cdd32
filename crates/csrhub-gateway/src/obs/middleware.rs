use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::app_state::AppState;

/// Count every routed request by route template, method, and status.
pub async fn track_requests(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = req.method().as_str().to_owned();

    let res = next.run(req).await;

    let status = res.status();
    app.metrics().http_requests.inc(&[
        ("route", route.as_str()),
        ("method", method.as_str()),
        ("status", status.as_str()),
    ]);
    if status.is_server_error() {
        tracing::warn!(%route, %method, status = status.as_u16(), "request failed");
    }
    res
}
