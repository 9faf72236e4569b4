use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::AuthError;
use crate::api::ErrorResponse;

/// converts `AuthError` into appropriate HTTP responses
#[derive(Debug)]
pub struct AppError(pub AuthError);

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AuthError::Validation(_) | AuthError::InvalidOrExpiredInvite => {
                StatusCode::BAD_REQUEST
            }
            AuthError::Forbidden | AuthError::NotMember | AuthError::EmailMismatch => {
                StatusCode::FORBIDDEN
            }
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::DatabaseError(_)
            | AuthError::ConfigurationError(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}
