//! Error types for the authentication flow

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Verification already in progress")]
    VerificationInProgress,

    #[error("Invalid code")]
    InvalidOtp,

    #[error("Verification code expired")]
    OtpExpired,

    #[error("Recipient phone number is unverified")]
    DeliveryUnverifiedRecipient,

    #[error("Failed to send OTP: {0}")]
    DeliveryFailed(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fallback rendering for errors that escape the route layer. The handlers
/// recover every user-facing variant into a flash message and redirect, so
/// in practice only `Internal` reaches this impl.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::DuplicateUsername => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::VerificationInProgress
            | AuthError::InvalidOtp
            | AuthError::OtpExpired => StatusCode::BAD_REQUEST,
            AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::DeliveryUnverifiedRecipient | AuthError::DeliveryFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            AuthError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response();
            }
        };

        (status, self.to_string()).into_response()
    }
}
