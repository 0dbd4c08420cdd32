//! Axum router wiring.
//!
//! `/api/...` carries the authenticated resource routes; the operational
//! endpoints stay unauthenticated.

use axum::{extract::DefaultBodyLimit, middleware, Router};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.cfg().server.max_body_bytes;

    Router::new()
        .nest("/api", api::api_router())
        .merge(ops::routes())
        .layer(middleware::from_fn_with_state(state.clone(), obs::middleware::track_requests))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
