//! HTTP boundary: resource routes and custom actions under `/api`.

pub mod actions;
pub mod error;
pub mod extract;
pub mod resource;
pub mod resources;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiPath};
pub use resource::{Resource, WriteCtx};

use axum::{routing::post, Router};

use csrhub_core::model::{
    CsrProject, Mou, Notification, Region, Report, Request, Survey, SurveyQuestion,
    SurveyResponse, User,
};

use crate::app_state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/users", resource::routes::<User>())
        .nest("/regions", resource::routes::<Region>())
        .nest("/mous", resource::routes::<Mou>())
        .nest(
            "/projects",
            resource::routes::<CsrProject>().route("/:id/assign_user", post(actions::assign_user)),
        )
        .nest("/reports", resource::routes::<Report>())
        .nest("/surveys", resource::routes::<Survey>())
        .nest("/survey-questions", resource::routes::<SurveyQuestion>())
        .nest("/survey-responses", resource::routes::<SurveyResponse>())
        .nest(
            "/notifications",
            resource::routes::<Notification>()
                .route("/:id/mark_as_read", post(actions::mark_as_read)),
        )
        .nest("/requests", resource::routes::<Request>())
}
