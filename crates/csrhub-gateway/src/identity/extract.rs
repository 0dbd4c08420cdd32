use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use csrhub_core::error::CsrError;
use csrhub_core::model::Caller;

use crate::api::ApiError;
use crate::app_state::AppState;

/// Extractor for handlers that require an authenticated caller.
///
/// Expects `Authorization: Bearer <token>`. The token's user must still exist:
/// deleting an account invalidates its token.
pub struct Authenticated(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &AppState) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts) {
            Some(t) => t,
            None => return Err(reject(app, "missing_token")),
        };

        let user_id = match app.identity().resolve(token).await {
            Ok(id) => id,
            Err(_) => return Err(reject(app, "unknown_token")),
        };
        let Some(user) = app.store().users.get(user_id) else {
            return Err(reject(app, "account_removed"));
        };

        Ok(Authenticated(Caller::new(user.id, user.role, user.is_superuser)))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

fn reject(app: &AppState, reason: &'static str) -> ApiError {
    app.metrics().auth_failures.inc(&[("reason", reason)]);
    tracing::debug!(reason, "authentication failed");
    ApiError(CsrError::AuthFailed)
}
