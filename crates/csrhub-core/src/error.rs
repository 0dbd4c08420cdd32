//! Shared error type across csrhub crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed payload.
    BadRequest,
    /// Missing or unknown credentials.
    AuthFailed,
    /// Denied by the access policy.
    NotAllowed,
    /// Target row does not exist (or is not visible to the caller).
    NotFound,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::NotAllowed => "NOT_ALLOWED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CsrError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum CsrError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("auth failed")]
    AuthFailed,
    #[error("not allowed: {0}")]
    NotAllowed(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl CsrError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            CsrError::BadRequest(_) => ClientCode::BadRequest,
            CsrError::AuthFailed => ClientCode::AuthFailed,
            CsrError::NotAllowed(_) => ClientCode::NotAllowed,
            CsrError::NotFound(_) => ClientCode::NotFound,
            CsrError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            CsrError::Internal(_) => ClientCode::Internal,
        }
    }
}
