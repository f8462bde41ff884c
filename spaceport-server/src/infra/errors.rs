use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use spaceport_core::{ResourceError, auth::LoginError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<ResourceError> for AppError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::InvalidIdentifier(_) | ResourceError::Validation(_) => {
                Self::bad_request(err.to_string())
            }
            ResourceError::NotFound { .. } => Self::not_found(err.to_string()),
            ResourceError::Forbidden(msg) => Self::forbidden(msg),
            ResourceError::Conflict(msg) => Self::conflict(msg),
            ResourceError::Hashing(err) => {
                tracing::error!(error = %err, "password hashing failed");
                Self::internal("Password hashing failed")
            }
            ResourceError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                Self::internal("Store operation failed")
            }
        }
    }
}

/// Only the non-credential failures; bad handles and secrets are answered
/// by the login handler itself.
impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        tracing::error!(target: "auth", error = %err, "login failed unexpectedly");
        Self::internal("Login failed")
    }
}
