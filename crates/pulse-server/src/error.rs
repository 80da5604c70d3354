use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pulse_core::errors::ServiceError;
use serde_json::json;

/// HTTP wrapper for [`ServiceError`]. The wire body carries only the
/// stable code; storage detail stays in the server log.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::InvalidInput | ServiceError::InvalidAnswers => StatusCode::BAD_REQUEST,
            ServiceError::InvalidCredentials | ServiceError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::EmailTaken => StatusCode::CONFLICT,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let ServiceError::Storage(e) = &self.0 {
            tracing::error!(error = ?e, "request failed on storage");
        }
        (status, Json(json!({ "error": self.0.code() }))).into_response()
    }
}
