use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use veritrail_core::AuditError;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core audit errors.
#[derive(Debug)]
pub struct ApiError(pub AuditError);

impl From<AuditError> for ApiError {
    fn from(value: AuditError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AuditError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AuditError::UnknownApplication { .. } => StatusCode::NOT_FOUND,
            AuditError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            AuditError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorResponse {
            message: self.0.to_string(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
