//! Custom actions beyond plain CRUD.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use csrhub_core::error::{CsrError, Result};
use csrhub_core::model::{CsrProject, Id, Operation, UserId};

use super::error::ApiResult;
use super::extract::{ApiJson, ApiPath};
use super::resource::target;
use crate::app_state::AppState;
use crate::identity::Authenticated;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignUserReq {
    pub user_id: UserId,
}

/// `POST /api/projects/:id/assign_user`. Assigning twice is a no-op.
pub async fn assign_user(
    State(app): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiPath(id): ApiPath<Id>,
    ApiJson(req): ApiJson<AssignUserReq>,
) -> ApiResult<Json<Value>> {
    let store = app.store();
    let project = target::<CsrProject>(store, id)?;
    app.authorize(&caller, Some(&project), Operation::AssignUser)?;

    if !store.users.exists(req.user_id) {
        return Err(CsrError::NotFound("User not found".into()).into());
    }

    let added = store
        .projects
        .update(id, |p| p.assign(req.user_id))
        .ok_or_else(|| CsrError::NotFound(format!("project {id}")))?;

    // The account cascade may have run between the check and the insert.
    if !store.users.exists(req.user_id) {
        store.projects.update(id, |p| p.assigned_users.remove(&req.user_id));
        return Err(CsrError::NotFound("User not found".into()).into());
    }

    tracing::info!(caller = caller.id, project = id, user = req.user_id, added, "user assigned");
    Ok(Json(json!({ "status": "user assigned" })))
}

/// `POST /api/notifications/:id/mark_as_read`. Idempotent.
pub async fn mark_as_read(
    State(app): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<Json<Value>> {
    let changed = app
        .store()
        .notifications
        .update(id, |n| -> Result<bool> {
            app.authorize(&caller, Some(&*n), Operation::MarkRead)?;
            Ok(n.mark_read())
        })
        .ok_or_else(|| CsrError::NotFound(format!("notification {id}")))??;

    tracing::debug!(caller = caller.id, notification = id, changed, "notification marked read");
    Ok(Json(json!({ "status": "notification marked as read" })))
}
