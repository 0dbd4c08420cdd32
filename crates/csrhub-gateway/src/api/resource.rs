//! Generic CRUD handlers shared by every collection.
//!
//! Reads go through the visibility filter; writes resolve the target row,
//! then ask the policy engine, then hit the store. A row outside the caller's
//! visible set is reported as missing on retrieve.

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use csrhub_core::error::{CsrError, Result};
use csrhub_core::model::{Caller, Id, Operation, Record};

use super::error::ApiResult;
use super::extract::{ApiJson, ApiPath};
use crate::app_state::AppState;
use crate::identity::Authenticated;
use crate::store::{Store, Table};

/// Everything a write needs besides the payload.
pub struct WriteCtx<'a> {
    pub store: &'a Store,
    pub caller: &'a Caller,
    pub now: DateTime<Utc>,
}

/// A collection exposed over HTTP.
pub trait Resource: Record + Clone + Send + Sync + 'static {
    /// Create/update payload; also the base that PATCH bodies merge over.
    type Write: Serialize + DeserializeOwned + Send + 'static;
    type View: Serialize + Send;

    fn table(store: &Store) -> &Table<Self>;

    fn create(id: Id, input: Self::Write, ctx: &WriteCtx<'_>) -> Result<Self>;

    fn apply(&mut self, input: Self::Write, ctx: &WriteCtx<'_>) -> Result<()>;

    fn to_write(&self) -> Self::Write;

    fn view(&self, store: &Store) -> Self::View;

    /// Delete with whatever cascade the collection needs.
    fn remove(store: &Store, id: Id) -> Option<Self> {
        Self::table(store).remove(id)
    }
}

pub fn routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/:id",
            get(retrieve::<R>)
                .put(update::<R>)
                .patch(partial_update::<R>)
                .delete(destroy::<R>),
        )
}

/// Resolve a mutation target among all rows (not only visible ones), so the
/// policy engine can tell "missing" apart from "not yours".
pub fn target<R: Resource>(store: &Store, id: Id) -> Result<R> {
    R::table(store)
        .get(id)
        .ok_or_else(|| CsrError::NotFound(format!("{} {id}", R::KIND)))
}

async fn list<R: Resource>(
    State(app): State<AppState>,
    Authenticated(caller): Authenticated,
) -> ApiResult<Json<Vec<R::View>>> {
    let store = app.store();
    let rows = R::table(store).all();
    let visible = app.policy().filter_collection(&caller, &rows);
    Ok(Json(visible.into_iter().map(|r| r.view(store)).collect()))
}

async fn retrieve<R: Resource>(
    State(app): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<Json<R::View>> {
    let store = app.store();
    let row = R::table(store)
        .get(id)
        .filter(|r| app.policy().is_visible(&caller, r))
        .ok_or_else(|| CsrError::NotFound(format!("{} {id}", R::KIND)))?;
    Ok(Json(row.view(store)))
}

async fn create<R: Resource>(
    State(app): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(input): ApiJson<R::Write>,
) -> ApiResult<(StatusCode, Json<R::View>)> {
    app.authorize::<R>(&caller, None, Operation::Create)?;

    let store = app.store();
    let ctx = WriteCtx { store, caller: &caller, now: Utc::now() };
    let row = R::table(store).try_insert_with(|id| R::create(id, input, &ctx))?;
    settle_owner(store, &row)?;

    tracing::info!(caller = caller.id, kind = %R::KIND, id = row.id(), "created");
    Ok((StatusCode::CREATED, Json(row.view(store))))
}

async fn update<R: Resource>(
    State(app): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<R::Write>,
) -> ApiResult<Json<R::View>> {
    let view = save::<R>(&app, &caller, id, |_| Ok(input))?;
    Ok(Json(view))
}

async fn partial_update<R: Resource>(
    State(app): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiPath(id): ApiPath<Id>,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<Json<R::View>> {
    let view = save::<R>(&app, &caller, id, |current| {
        let mut merged = serde_json::to_value(current.to_write())
            .map_err(|e| CsrError::Internal(format!("encode {} failed: {e}", R::KIND)))?;
        merge_object(&mut merged, patch)?;
        serde_json::from_value(merged)
            .map_err(|e| CsrError::BadRequest(format!("invalid {} payload: {e}", R::KIND)))
    })?;
    Ok(Json(view))
}

async fn destroy<R: Resource>(
    State(app): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiPath(id): ApiPath<Id>,
) -> ApiResult<StatusCode> {
    let row = target::<R>(app.store(), id)?;
    app.authorize(&caller, Some(&row), Operation::Delete)?;

    R::remove(app.store(), id).ok_or_else(|| CsrError::NotFound(format!("{} {id}", R::KIND)))?;
    tracing::info!(caller = caller.id, kind = %R::KIND, id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Authorize and apply an update against the live row under its shard lock.
///
/// `payload` sees the current row, so a PATCH merges over the latest state.
/// Fields a payload does not cover (project assignments, read flags) are
/// never written back from a stale copy. A failed write leaves the row as it
/// was.
fn save<R: Resource>(
    app: &AppState,
    caller: &Caller,
    id: Id,
    payload: impl FnOnce(&R) -> Result<R::Write>,
) -> Result<R::View> {
    let store = app.store();
    let ctx = WriteCtx { store, caller, now: Utc::now() };

    let row = R::table(store)
        .update(id, |row: &mut R| -> Result<R> {
            app.authorize(caller, Some(&*row), Operation::Update)?;
            let mut next = row.clone();
            next.apply(payload(&*row)?, &ctx)?;
            *row = next.clone();
            Ok(next)
        })
        .ok_or_else(|| CsrError::NotFound(format!("{} {id}", R::KIND)))??;
    settle_owner(store, &row)?;

    tracing::info!(caller = caller.id, kind = %R::KIND, id, "updated");
    Ok(row.view(store))
}

/// A row written for an owner whose account was deleted meanwhile may have
/// been missed by the account cascade. Remove it again.
fn settle_owner<R: Resource>(store: &Store, row: &R) -> Result<()> {
    match row.owner_ref() {
        Some(owner) if !store.users.exists(owner) => {
            R::remove(store, row.id());
            tracing::debug!(kind = %R::KIND, id = row.id(), owner, "owner vanished during write");
            Err(CsrError::BadRequest(format!("unknown user: {owner}")))
        }
        _ => Ok(()),
    }
}

/// Shallow merge of a PATCH body over the current write representation.
fn merge_object(base: &mut Value, patch: Value) -> Result<()> {
    let Value::Object(fields) = patch else {
        return Err(CsrError::BadRequest("patch body must be a JSON object".into()));
    };
    let Value::Object(current) = base else {
        return Err(CsrError::Internal("write representation is not an object".into()));
    };
    for (k, v) in fields {
        current.insert(k, v);
    }
    Ok(())
}
