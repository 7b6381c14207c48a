//! JSON error responses.

use crate::failure::FailureCause;
use crate::project::services::ProjectServiceError;
use crate::task::services::TaskServiceError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Error rendered as `{"error": "<message>"}` with a matching status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates an error from a failure class and a client-facing message.
    ///
    /// Server failures never echo `message`; it is logged instead.
    #[must_use]
    pub fn from_cause(cause: FailureCause, message: impl Into<String>) -> Self {
        let text = message.into();
        if cause == FailureCause::Server {
            tracing::error!(error = %text, "request failed");
            return Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: INTERNAL_MESSAGE.to_owned(),
            };
        }
        Self {
            status: status_for(cause),
            message: text,
        }
    }

    /// 400 with the given message.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::from_cause(FailureCause::Validation, message)
    }

    /// 401 with the given message.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::from_cause(FailureCause::Unauthenticated, message)
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

const fn status_for(cause: FailureCause) -> StatusCode {
    match cause {
        FailureCause::Unauthenticated => StatusCode::UNAUTHORIZED,
        FailureCause::Forbidden => StatusCode::FORBIDDEN,
        FailureCause::NotFound => StatusCode::NOT_FOUND,
        FailureCause::Validation => StatusCode::BAD_REQUEST,
        FailureCause::NetworkFailure => StatusCode::BAD_GATEWAY,
        FailureCause::Server => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        Self::from_cause(err.cause(), err.to_string())
    }
}

impl From<ProjectServiceError> for ApiError {
    fn from(err: ProjectServiceError) -> Self {
        Self::from_cause(err.cause(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FailureCause::Unauthenticated, StatusCode::UNAUTHORIZED)]
    #[case(FailureCause::Forbidden, StatusCode::FORBIDDEN)]
    #[case(FailureCause::NotFound, StatusCode::NOT_FOUND)]
    #[case(FailureCause::Validation, StatusCode::BAD_REQUEST)]
    fn causes_map_to_status_codes(#[case] cause: FailureCause, #[case] expected: StatusCode) {
        let err = ApiError::from_cause(cause, "nope");
        assert_eq!(err.status(), expected);
        assert_eq!(err.message(), "nope");
    }

    #[rstest]
    fn server_failures_hide_details() {
        let err = ApiError::from_cause(FailureCause::Server, "connection refused by 10.0.0.5");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_MESSAGE);
    }
}
