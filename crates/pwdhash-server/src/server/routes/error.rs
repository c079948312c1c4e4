//! Mapping from service errors to HTTP responses.

use axum::{
    extract::rejection::{FormRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error returned by route handlers.
///
/// Bodies are plain text; clients only rely on the status code.
#[derive(Debug)]
pub enum ApiError {
    /// An error reported by the hashing service.
    Service(pwdhash::Error),
    /// The request could not be interpreted.
    BadRequest(String),
}

impl ApiError {
    /// Short label used for logs and rejection metrics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Service(pwdhash::Error::Validation { .. }) => "validation",
            Self::Service(pwdhash::Error::QueueClosed) => "shutting_down",
            Self::Service(_) => "internal",
            Self::BadRequest(_) => "bad_request",
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Service(pwdhash::Error::Validation { .. }) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(pwdhash::Error::QueueClosed) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<pwdhash::Error> for ApiError {
    fn from(err: pwdhash::Error) -> Self {
        Self::Service(err)
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Service(err) => err.to_string(),
            Self::BadRequest(reason) => reason,
        };

        if status.is_server_error() {
            tracing::error!(%status, "{message}");
        } else {
            tracing::debug!(%status, "{message}");
        }

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (
                pwdhash::Error::Validation {
                    reason: "too long".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (pwdhash::Error::QueueClosed, StatusCode::SERVICE_UNAVAILABLE),
            (
                pwdhash::Error::Worker {
                    context: "panicked".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                pwdhash::Error::InvalidConfig {
                    reason: "zero".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn bad_request_keeps_reason() {
        let err = ApiError::BadRequest("missing `password` field".to_string());
        assert_eq!(err.kind(), "bad_request");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
