// ABOUTME: API error wrapper translating AuthError into HTTP responses
// ABOUTME: Maps the error taxonomy onto status codes with a structured JSON body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use hubgate_auth::AuthError;

/// Handler-level error: every handler returns `Result<_, ApiError>`.
#[derive(Debug)]
pub struct ApiError(AuthError);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            // Upstream rejections keep the upstream status where it is one
            AuthError::Provider { status, .. } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                "PROVIDER_ERROR",
            ),
            AuthError::StateMismatch => (StatusCode::BAD_REQUEST, "STATE_MISMATCH"),
            AuthError::InvalidCallback(_) => (StatusCode::BAD_REQUEST, "INVALID_CALLBACK"),
            AuthError::CredentialsNotFound(_) => {
                (StatusCode::NOT_FOUND, "CREDENTIALS_NOT_FOUND")
            }
            AuthError::AuthorizationExpired => {
                (StatusCode::UNAUTHORIZED, "AUTHORIZATION_EXPIRED")
            }
            AuthError::Configuration(_) => (StatusCode::BAD_REQUEST, "INVALID_PROVIDER"),
            AuthError::MalformedResponse(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MALFORMED_RESPONSE")
            }
            AuthError::Network(_) => (StatusCode::INTERNAL_SERVER_ERROR, "NETWORK_ERROR"),
            AuthError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            AuthError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.to_status_and_code();

        if status.is_server_error() {
            error!("Request failed with {}: {}", code, self.0);
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code,
                message: self.0.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}
