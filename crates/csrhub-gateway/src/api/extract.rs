//! Body and path extractors whose rejections render as [`ApiError`].

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};

use csrhub_core::error::CsrError;

use super::error::ApiError;

/// JSON request body. Malformed JSON, unknown or missing fields and a wrong
/// content type are all `BAD_REQUEST`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters, e.g. the `:id` of a row.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(CsrError::BadRequest(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(CsrError::BadRequest(rejection.body_text()))
    }
}
