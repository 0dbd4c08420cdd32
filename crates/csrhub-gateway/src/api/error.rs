use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use csrhub_core::error::CsrError;

/// HTTP rendering of [`CsrError`].
#[derive(Debug)]
pub struct ApiError(pub CsrError);

impl From<CsrError> for ApiError {
    fn from(e: CsrError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CsrError::BadRequest(_) | CsrError::UnsupportedVersion => StatusCode::BAD_REQUEST,
            CsrError::AuthFailed => StatusCode::UNAUTHORIZED,
            CsrError::NotAllowed(_) => StatusCode::FORBIDDEN,
            CsrError::NotFound(_) => StatusCode::NOT_FOUND,
            CsrError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
