//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error construction so every failure leaves the service
//! as `{"message": ...}` with a status that matches its category.
//!
//! # Key invariants
//! - Store failures never escape a handler; each one maps to a status here.
//! - Internal errors are logged server-side and answered with a generic
//!   message.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use petcare_api::api::error::ApiError;
/// use petcare_api::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::NOT_FOUND,
///     body: ErrorResponse {
///         message: "Pet not found".to_string(),
///     },
/// };
/// assert_eq!(err.status, StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            message: message.to_string(),
        },
    }
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, message)
}

/// Build a 400 Bad Request error carrying the validation message.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, message)
}

/// Build a 500 from a store error.
///
/// The store error is logged; the caller only sees `message`.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "pet storage error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Build a 500 with no underlying store error to log.
pub fn api_internal_message(message: &str) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Translate a store failure on a single pet into an HTTP error.
///
/// # Errors
/// - `NotFound` becomes 404 `Pet not found`.
/// - `Validation` becomes 400 with the validation message.
/// - Anything else becomes 500 with `message`.
pub fn api_pet_error(message: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(_) => api_not_found("Pet not found"),
        StoreError::Validation(invalid) => api_validation_error(&invalid.to_string()),
        other => api_internal(message, &other),
    }
}

/// Body could not be read as JSON (syntax, wrong types, missing content type).
pub fn api_bad_json(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    api_error(StatusCode::BAD_REQUEST, &rejection.body_text())
}
