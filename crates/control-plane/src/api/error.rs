// Mapping of scheduling errors onto HTTP responses
//
// 400 validation, 404 not found, 409 conflict or invalid transition,
// 500 storage. Storage details are logged, never returned.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use schedulink_core::SchedulingError;

use super::common::ErrorResponse;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, body: ErrorResponse) -> Self {
        Self { status, body }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorResponse::new(message))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<SchedulingError> for ApiError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::Validation(message) => Self::bad_request(message),
            SchedulingError::NotFound(message) => {
                Self::new(StatusCode::NOT_FOUND, ErrorResponse::new(message))
            }
            SchedulingError::Conflict(conflict) => Self::new(
                StatusCode::CONFLICT,
                ErrorResponse::new(format!(
                    "Cannot approve event due to conflict: {}",
                    conflict.message
                ))
                .with_conflicts(vec![*conflict]),
            ),
            SchedulingError::Conflicts(conflicts) => {
                let message = conflicts
                    .iter()
                    .map(|conflict| conflict.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                Self::new(
                    StatusCode::CONFLICT,
                    ErrorResponse::new(format!("Event conflicts detected: {message}"))
                        .with_conflicts(conflicts),
                )
            }
            err @ SchedulingError::InvalidTransition { .. } => {
                Self::new(StatusCode::CONFLICT, ErrorResponse::new(err.to_string()))
            }
            err @ (SchedulingError::Storage(_) | SchedulingError::Internal(_)) => {
                tracing::error!("Request failed: {}", err);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (SchedulingError::validation("bad"), StatusCode::BAD_REQUEST),
            (SchedulingError::not_found("gone"), StatusCode::NOT_FOUND),
            (SchedulingError::Conflicts(vec![]), StatusCode::CONFLICT),
            (
                SchedulingError::invalid_transition("declined", "approved"),
                StatusCode::CONFLICT,
            ),
            (
                SchedulingError::storage("connection refused"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_storage_details_are_not_leaked() {
        let err = ApiError::from(SchedulingError::storage("password authentication failed"));
        assert_eq!(err.body.error, "Internal server error");
        assert!(err.body.conflicts.is_none());
    }
}
